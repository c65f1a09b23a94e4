use askama::Template;
use axum::{response::{Html, IntoResponse}, routing::get, Router};

use crate::error::AppError;
use crate::{AppState, STATIC_HASH};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    static_hash: &'static str,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    static_hash: &'static str,
}

#[derive(Template)]
#[template(path = "publish.html")]
struct PublishTemplate {
    static_hash: &'static str,
}

#[derive(Template)]
#[template(path = "join.html")]
struct JoinTemplate {
    static_hash: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/login", get(login))
        .route("/publish", get(publish))
        .route("/join", get(join))
}

async fn index() -> Result<impl IntoResponse, AppError> {
    let template = IndexTemplate { static_hash: STATIC_HASH };
    Ok(Html(template.render()?))
}

async fn login() -> Result<impl IntoResponse, AppError> {
    let template = LoginTemplate { static_hash: STATIC_HASH };
    Ok(Html(template.render()?))
}

async fn publish() -> Result<impl IntoResponse, AppError> {
    let template = PublishTemplate { static_hash: STATIC_HASH };
    Ok(Html(template.render()?))
}

async fn join() -> Result<impl IntoResponse, AppError> {
    let template = JoinTemplate { static_hash: STATIC_HASH };
    Ok(Html(template.render()?))
}
