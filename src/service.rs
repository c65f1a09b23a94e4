use serde_json::json;

use crate::error::{Missing, ServiceError};
use crate::models::{CollaborationRequest, NewCollaborationRequest, NewProject, Project, Resolution};
use crate::rooms::{RoomBroadcaster, RoomEvent};
use crate::store::ProjectStore;

pub const COLLABORATION_REQUEST_EVENT: &str = "collaborationRequest";
pub const COLLABORATION_RESPONSE_EVENT: &str = "collaborationResponse";

/// Project and collaboration-request operations, with the room
/// notifications that follow each successful write.
#[derive(Clone)]
pub struct ProjectService {
    store: ProjectStore,
    rooms: RoomBroadcaster,
}

impl ProjectService {
    pub fn new(store: ProjectStore, rooms: RoomBroadcaster) -> Self {
        Self { store, rooms }
    }

    pub fn rooms(&self) -> &RoomBroadcaster {
        &self.rooms
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ServiceError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn create_project(&self, input: NewProject) -> Result<Project, ServiceError> {
        let title = required(input.title, "title")?;
        let description = required(input.description, "description")?;
        let skills = input.skills.unwrap_or_default();

        let project = Project::new(title, description, skills);
        self.store.insert_project(&project).await?;

        tracing::info!("Published project {} ({})", project.id, project.title);
        Ok(project)
    }

    /// Append a request to the project and notify the project's room with
    /// the full updated sequence.
    pub async fn request_collaboration(
        &self,
        project_id: &str,
        input: NewCollaborationRequest,
    ) -> Result<CollaborationRequest, ServiceError> {
        let user_id = required(input.user_id, "userId")?;
        let username = required(input.username, "username")?;

        if self.store.find_by_id(project_id).await?.is_none() {
            return Err(ServiceError::NotFound(Missing::Project));
        }

        let request = self
            .store
            .push_collaboration_request(project_id, user_id, username)
            .await?;

        let requests = self.store.collaboration_requests(project_id).await?;
        self.rooms
            .publish(
                project_id,
                RoomEvent::new(COLLABORATION_REQUEST_EVENT, json!(requests)),
            )
            .await;

        Ok(request)
    }

    /// Remove a pending request and notify the requester's own room.
    ///
    /// The response goes to a room named after the requester's `userId`,
    /// not the project room.
    pub async fn resolve_collaboration(
        &self,
        project_id: &str,
        request_id: &str,
        input: Resolution,
    ) -> Result<(), ServiceError> {
        let accepted = input
            .accepted
            .ok_or_else(|| ServiceError::Validation("accepted is required".to_string()))?;

        if self.store.find_by_id(project_id).await?.is_none() {
            return Err(ServiceError::NotFound(Missing::Project));
        }

        let Some(request) = self
            .store
            .find_collaboration_request(project_id, request_id)
            .await?
        else {
            return Err(ServiceError::NotFound(Missing::CollaborationRequest));
        };

        // A concurrent resolution may have removed it since the lookup.
        if !self
            .store
            .remove_collaboration_request(project_id, request_id)
            .await?
        {
            return Err(ServiceError::NotFound(Missing::CollaborationRequest));
        }

        self.rooms
            .publish(
                &request.user_id,
                RoomEvent::new(
                    COLLABORATION_RESPONSE_EVENT,
                    json!({ "projectId": project_id, "accepted": accepted }),
                ),
            )
            .await;

        Ok(())
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, ServiceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ServiceError::Validation(format!("{field} is required"))),
    }
}
