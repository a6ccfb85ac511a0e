use shared_types::{AppError, CompanyMembership, CompanyRole};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

#[derive(sqlx::FromRow)]
struct MembershipRow {
    user_id: i64,
    company_id: Uuid,
    role: String,
}

impl From<MembershipRow> for CompanyMembership {
    fn from(row: MembershipRow) -> Self {
        CompanyMembership {
            user_id: row.user_id,
            company_id: Some(row.company_id),
            role: CompanyRole::from_str_or_default(&row.role),
        }
    }
}

/// The user's membership, if any. `company_members.user_id` is unique.
pub async fn find_for_user(
    pool: &Pool<Postgres>,
    user_id: i64,
) -> Result<Option<CompanyMembership>, AppError> {
    let row = sqlx::query_as::<_, MembershipRow>(
        "SELECT user_id, company_id, role FROM company_members WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row.map(CompanyMembership::from))
}

/// Add a user to a company with the given role.
pub async fn create(
    pool: &Pool<Postgres>,
    user_id: i64,
    company_id: Uuid,
    role: CompanyRole,
) -> Result<CompanyMembership, AppError> {
    let row = sqlx::query_as::<_, MembershipRow>(
        r#"
        INSERT INTO company_members (user_id, company_id, role)
        VALUES ($1, $2, $3)
        RETURNING user_id, company_id, role
        "#,
    )
    .bind(user_id)
    .bind(company_id)
    .bind(role.as_str())
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row.into())
}

/// Insert a company and return its id.
pub async fn create_company(pool: &Pool<Postgres>, name: &str) -> Result<Uuid, AppError> {
    sqlx::query_scalar::<_, Uuid>("INSERT INTO companies (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}
