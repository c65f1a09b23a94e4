use std::net::SocketAddr;

use collab_board::{build_app, db, AppState};
use tokio::net::TcpListener;

const PORT: u16 = 3000;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:data/collab.db".to_string());

    let pool = match db::init_pool(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };
    let app = build_app(AppState::new(pool));

    let addr = SocketAddr::from(([0, 0, 0, 0], PORT));
    let listener = TcpListener::bind(addr).await.expect("Failed to bind listener");

    tracing::info!("Server running on port {}", PORT);
    axum::serve(listener, app).await.expect("Server error");
}
