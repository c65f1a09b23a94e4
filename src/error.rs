use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Which record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Project,
    CollaborationRequest,
}

impl std::fmt::Display for Missing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Missing::Project => write!(f, "Project not found."),
            Missing::CollaborationRequest => write!(f, "Collaboration request not found."),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(Missing),
    #[error("{0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

#[derive(Debug)]
pub enum AppError {
    Service(ServiceError),
    Template(askama::Error),
    Body(JsonRejection),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Service(ServiceError::NotFound(missing)) => {
                error_body(StatusCode::NOT_FOUND, missing.to_string())
            }
            AppError::Service(ServiceError::Validation(message)) => {
                error_body(StatusCode::BAD_REQUEST, message)
            }
            AppError::Body(rejection) => error_body(StatusCode::BAD_REQUEST, rejection.body_text()),
            AppError::Service(ServiceError::Storage(e)) => {
                tracing::error!("Database error: {e}");
                internal_error()
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {e}");
                internal_error()
            }
        }
    }
}

fn error_body(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn internal_error() -> Response {
    error_body(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Something went wrong.".to_string(),
    )
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        AppError::Service(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Body(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_names_the_missing_record() {
        let resp = AppError::from(ServiceError::NotFound(Missing::CollaborationRequest))
            .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Collaboration request not found.");
    }

    #[tokio::test]
    async fn storage_failure_is_generic() {
        let resp = AppError::from(ServiceError::Storage(sqlx::Error::PoolClosed)).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Something went wrong.");
    }

    #[tokio::test]
    async fn validation_is_bad_request() {
        let resp = AppError::from(ServiceError::Validation("title is required".into()))
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "title is required");
    }
}
