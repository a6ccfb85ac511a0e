use shared_types::{AppError, ChatTurn, ConversationAnalysis};
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const COLUMNS: &str = "id, user_id, company_id, mood_score, summary, created_at";

/// Store a completed check-in with its transcript.
pub async fn create(
    pool: &Pool<Postgres>,
    user_id: i64,
    company_id: Option<Uuid>,
    mood_score: i16,
    summary: &str,
    turns: &[ChatTurn],
) -> Result<ConversationAnalysis, AppError> {
    sqlx::query_as::<_, ConversationAnalysis>(&format!(
        r#"
        INSERT INTO conversation_analyses (user_id, company_id, mood_score, summary, messages)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(company_id)
    .bind(mood_score)
    .bind(summary)
    .bind(Json(turns))
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn count_for_user(pool: &Pool<Postgres>, user_id: i64) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM conversation_analyses WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn count_for_company(pool: &Pool<Postgres>, company_id: Uuid) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM conversation_analyses WHERE company_id = $1")
        .bind(company_id)
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Newest first.
pub async fn list_for_user(
    pool: &Pool<Postgres>,
    user_id: i64,
    limit: i64,
) -> Result<Vec<ConversationAnalysis>, AppError> {
    sqlx::query_as::<_, ConversationAnalysis>(&format!(
        "SELECT {COLUMNS} FROM conversation_analyses WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
    ))
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Newest first.
pub async fn list_for_company(
    pool: &Pool<Postgres>,
    company_id: Uuid,
    limit: i64,
) -> Result<Vec<ConversationAnalysis>, AppError> {
    sqlx::query_as::<_, ConversationAnalysis>(&format!(
        "SELECT {COLUMNS} FROM conversation_analyses WHERE company_id = $1 ORDER BY created_at DESC LIMIT $2"
    ))
    .bind(company_id)
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
