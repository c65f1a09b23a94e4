#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use collab_board::{build_app, AppState};
use http_body_util::BodyExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub db: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to create in-memory SQLite pool");

        collab_board::db::migrate(&pool)
            .await
            .expect("Failed to run migrations");

        let state = AppState::new(pool.clone());
        let router = build_app(state.clone());

        Self {
            router,
            state,
            db: pool,
        }
    }

    /// Send a request through the app and return the response.
    pub async fn request(&self, req: Request<Body>) -> Response {
        tower::ServiceExt::oneshot(self.router.clone(), req)
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.request(req).await
    }

    /// Send a request with a raw body and content type.
    pub async fn send(&self, method: &str, uri: &str, content_type: &str, body: &str) -> Response {
        let req = Request::builder()
            .uri(uri)
            .method(method)
            .header("content-type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(req).await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response {
        self.send("POST", uri, "application/json", &body.to_string()).await
    }

    pub async fn patch_json(&self, uri: &str, body: serde_json::Value) -> Response {
        self.send("PATCH", uri, "application/json", &body.to_string()).await
    }

    /// Fetch `/api/projects` and return the `projects` array.
    pub async fn projects(&self) -> Vec<serde_json::Value> {
        let resp = self.get("/api/projects").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        json["projects"].as_array().unwrap().clone()
    }

    /// Publish a project through the API and return its id.
    pub async fn create_project(&self, title: &str, description: &str, skills: &str) -> String {
        let resp = self
            .post_json(
                "/api/projects",
                serde_json::json!({ "title": title, "description": description, "skills": skills }),
            )
            .await;
        assert_redirect(&resp, "/");

        self.projects()
            .await
            .into_iter()
            .rev()
            .find(|p| p["title"] == title)
            .and_then(|p| p["id"].as_str().map(str::to_string))
            .expect("Published project should be listed")
    }

    /// Send a collaboration request and return the new request's id.
    pub async fn collaborate(&self, project_id: &str, user_id: &str, username: &str) -> String {
        let resp = self
            .post_json(
                &format!("/api/projects/{project_id}/collaborate"),
                serde_json::json!({ "userId": user_id, "username": username }),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let project = self
            .projects()
            .await
            .into_iter()
            .find(|p| p["id"] == project_id)
            .unwrap();
        let requests = project["collaborationRequests"].as_array().unwrap();
        requests.last().unwrap()["id"].as_str().unwrap().to_string()
    }
}

/// Read the full response body as a String.
pub async fn body_string(resp: Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(resp: Response) -> serde_json::Value {
    let body = body_string(resp).await;
    serde_json::from_str(&body).unwrap()
}

/// Assert that a response is a redirect to the given location.
pub fn assert_redirect(resp: &Response, expected_location: &str) {
    assert!(
        resp.status().is_redirection(),
        "Expected redirect, got {}",
        resp.status()
    );
    let location = resp
        .headers()
        .get("location")
        .expect("Redirect should have location header")
        .to_str()
        .unwrap();
    assert_eq!(location, expected_location);
}
