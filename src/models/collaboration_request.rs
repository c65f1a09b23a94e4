use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationRequest {
    pub id: String,
    #[serde(skip)]
    pub project_id: String,
    pub user_id: String,
    pub username: String,
    pub created_at: String,
}

impl CollaborationRequest {
    pub fn new(project_id: String, user_id: String, username: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            project_id,
            user_id,
            username,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Body of `POST /api/projects/{id}/collaborate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollaborationRequest {
    pub user_id: Option<String>,
    pub username: Option<String>,
}

/// Body of `PATCH /api/projects/{id}/collaborate/{request_id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resolution {
    pub accepted: Option<bool>,
}
