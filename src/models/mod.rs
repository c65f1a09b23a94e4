pub mod collaboration_request;
pub mod project;

pub use collaboration_request::{CollaborationRequest, NewCollaborationRequest, Resolution};
pub use project::{NewProject, Project};
