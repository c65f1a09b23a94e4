use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;

use crate::error::AppError;
use crate::models::{NewCollaborationRequest, NewProject, Resolution};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list_projects))
        .route("/api/projects", post(create_project))
        .route("/api/projects/{project_id}/collaborate", post(request_collaboration))
        .route(
            "/api/projects/{project_id}/collaborate/{request_id}",
            patch(resolve_collaboration),
        )
}

async fn list_projects(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let projects = state.service.list_projects().await?;
    Ok(Json(json!({ "projects": projects })))
}

async fn create_project(
    State(state): State<AppState>,
    body: Result<Json<NewProject>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = body?;
    state.service.create_project(input).await?;
    Ok(Redirect::to("/"))
}

async fn request_collaboration(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    body: Result<Json<NewCollaborationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = body?;
    state.service.request_collaboration(&project_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Collaboration request sent." })),
    ))
}

async fn resolve_collaboration(
    State(state): State<AppState>,
    Path((project_id, request_id)): Path<(String, String)>,
    body: Result<Json<Resolution>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = body?;
    state
        .service
        .resolve_collaboration(&project_id, &request_id, input)
        .await?;
    Ok(Json(json!({ "message": "Collaboration request updated." })))
}
