use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::CollaborationRequest;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub skills: String,
    pub created_at: String,
    #[sqlx(skip)]
    pub collaboration_requests: Vec<CollaborationRequest>,
}

impl Project {
    pub fn new(title: String, description: String, skills: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            skills,
            created_at: Utc::now().to_rfc3339(),
            collaboration_requests: Vec::new(),
        }
    }
}

/// Body of `POST /api/projects`. Fields are optional so that absence is
/// reported as a validation error rather than a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub skills: Option<String>,
}
