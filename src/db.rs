use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("failed to connect to {url}: {source}")]
    Connect { url: String, source: sqlx::Error },
    #[error("failed to run migrations: {0}")]
    Migrate(#[from] MigrateError),
}

/// Open the pool for `database_url` and bring the schema up to date.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool, DbError> {
    if let Some(dir) = data_dir(database_url) {
        std::fs::create_dir_all(&dir).ok();
    }

    let connect_err = |source| DbError::Connect {
        url: database_url.to_string(),
        source,
    };

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(connect_err)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(connect_err)?;

    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Directory holding a file-backed database, if the URL names one.
fn data_dir(database_url: &str) -> Option<PathBuf> {
    let path = database_url.strip_prefix("sqlite:")?;
    let path = path.trim_start_matches("//");
    let path = path.split('?').next()?;
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}
