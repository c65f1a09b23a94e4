use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::models::{CollaborationRequest, Project};

/// Persistence for projects and the collaboration requests they own.
///
/// Requests are kept in their own table with a cascading foreign key; their
/// order within a project is insertion order (SQLite rowid).
#[derive(Clone)]
pub struct ProjectStore {
    db: SqlitePool,
}

impl ProjectStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }

    pub async fn insert_project(&self, project: &Project) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO projects (id, title, description, skills, created_at) VALUES (?, ?, ?, ?, ?)"
        )
        .bind(&project.id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.skills)
        .bind(&project.created_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    pub async fn find_all(&self) -> Result<Vec<Project>, sqlx::Error> {
        let mut projects: Vec<Project> =
            sqlx::query_as("SELECT * FROM projects ORDER BY rowid")
                .fetch_all(&self.db)
                .await?;

        let requests: Vec<CollaborationRequest> =
            sqlx::query_as("SELECT * FROM collaboration_requests ORDER BY rowid")
                .fetch_all(&self.db)
                .await?;

        let mut by_project: HashMap<String, Vec<CollaborationRequest>> = HashMap::new();
        for request in requests {
            by_project
                .entry(request.project_id.clone())
                .or_default()
                .push(request);
        }

        for project in &mut projects {
            project.collaboration_requests = by_project.remove(&project.id).unwrap_or_default();
        }

        Ok(projects)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Project>, sqlx::Error> {
        let project: Option<Project> = sqlx::query_as("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        let Some(mut project) = project else {
            return Ok(None);
        };

        project.collaboration_requests = self.collaboration_requests(&project.id).await?;
        Ok(Some(project))
    }

    pub async fn collaboration_requests(
        &self,
        project_id: &str,
    ) -> Result<Vec<CollaborationRequest>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM collaboration_requests WHERE project_id = ? ORDER BY rowid")
            .bind(project_id)
            .fetch_all(&self.db)
            .await
    }

    /// Append a request to the end of a project's sequence.
    pub async fn push_collaboration_request(
        &self,
        project_id: &str,
        user_id: String,
        username: String,
    ) -> Result<CollaborationRequest, sqlx::Error> {
        let request = CollaborationRequest::new(project_id.to_string(), user_id, username);

        sqlx::query(
            "INSERT INTO collaboration_requests (id, project_id, user_id, username, created_at) VALUES (?, ?, ?, ?, ?)"
        )
        .bind(&request.id)
        .bind(&request.project_id)
        .bind(&request.user_id)
        .bind(&request.username)
        .bind(&request.created_at)
        .execute(&self.db)
        .await?;

        Ok(request)
    }

    pub async fn find_collaboration_request(
        &self,
        project_id: &str,
        request_id: &str,
    ) -> Result<Option<CollaborationRequest>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM collaboration_requests WHERE id = ? AND project_id = ?")
            .bind(request_id)
            .bind(project_id)
            .fetch_optional(&self.db)
            .await
    }

    /// Returns whether a matching request was found and removed.
    pub async fn remove_collaboration_request(
        &self,
        project_id: &str,
        request_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM collaboration_requests WHERE id = ? AND project_id = ?")
                .bind(request_id)
                .bind(project_id)
                .execute(&self.db)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
