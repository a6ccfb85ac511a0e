use axum::extract::FromRef;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::sync::OnceLock;
use tokio::sync::OnceCell;

use crate::config::env_or;

/// State handed to the axum routes and middleware.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Pool<Postgres>,
}

/// Lazily connected pool shared by all server functions.
static POOL: OnceLock<Pool<Postgres>> = OnceLock::new();
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Build a pool from `DATABASE_URL`. No connection opens until the first query.
pub fn create_pool() -> Pool<Postgres> {
    let _ = dotenvy::dotenv();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let max_connections: u32 = env_or("DATABASE_MAX_CONNECTIONS", 10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy(&database_url)
        .expect("Failed to create database pool")
}

/// Apply the migrations under `/migrations`.
pub async fn run_migrations(pool: &Pool<Postgres>) {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .expect("Failed to run database migrations");
}

/// The process-wide pool. The first call runs migrations; concurrent
/// callers wait until they have finished.
pub async fn get_db() -> &'static Pool<Postgres> {
    let pool = POOL.get_or_init(create_pool);
    MIGRATED.get_or_init(|| run_migrations(pool)).await;
    pool
}
