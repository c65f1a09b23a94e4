pub mod db;
pub mod error;
pub mod models;
pub mod rooms;
pub mod routes;
pub mod service;
pub mod store;

pub const STATIC_HASH: &str = env!("STATIC_HASH");

use axum::{routing::get, Router};
use axum::http::{header, HeaderValue};
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::{
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::rooms::RoomBroadcaster;
use crate::service::ProjectService;
use crate::store::ProjectStore;

#[derive(Clone)]
pub struct AppState {
    pub service: ProjectService,
}

impl AppState {
    /// Wire a fresh room broadcaster and a store over `pool` into the service.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            service: ProjectService::new(ProjectStore::new(pool), RoomBroadcaster::new()),
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

/// Build the full Axum application router.
///
/// Caller is responsible for running database migrations on the state's pool
/// beforehand.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::pages::router())
        .merge(routes::projects::router())
        .merge(routes::socket::router())
        .nest_service(
            "/static",
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("public, max-age=86400"),
                ))
                .service(ServeDir::new("static")),
        )
        .layer(
            TraceLayer::new_for_http()
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
