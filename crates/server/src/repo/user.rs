use shared_types::{AppError, AuthUser};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

/// A user row including the password hash. Never leaves the server.
#[derive(Debug, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
}

impl From<UserCredentials> for AuthUser {
    fn from(row: UserCredentials) -> Self {
        AuthUser {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
        }
    }
}

/// Insert a user. A taken email surfaces as `Conflict`.
pub async fn create(
    pool: &Pool<Postgres>,
    email: &str,
    display_name: &str,
    password_hash: &str,
) -> Result<AuthUser, AppError> {
    sqlx::query_as::<_, AuthUser>(
        r#"
        INSERT INTO users (email, display_name, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, email, display_name
        "#,
    )
    .bind(email)
    .bind(display_name)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Case-insensitive lookup used by login.
pub async fn find_credentials_by_email(
    pool: &Pool<Postgres>,
    email: &str,
) -> Result<Option<UserCredentials>, AppError> {
    sqlx::query_as::<_, UserCredentials>(
        r#"
        SELECT id, email, display_name, password_hash
        FROM users
        WHERE LOWER(email) = LOWER($1)
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<AuthUser>, AppError> {
    sqlx::query_as::<_, AuthUser>("SELECT id, email, display_name FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}
