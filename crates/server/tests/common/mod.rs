use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware,
    routing::get,
    Extension, Json, Router,
};
use server::auth::jwt::Claims;
use server::db::AppState;
use shared_types::{AppError, ChatTurn, CompanyRole};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tokio::sync::OnceCell;
use tower::ServiceExt;
use uuid::Uuid;

/// Child tables before parents.
const ALL_TABLES: &str = "conversation_analyses, company_members, companies, refresh_tokens, users";

static INITIALIZED: OnceCell<()> = OnceCell::const_new();

/// Create `<db>_test` next to `DATABASE_URL`, point `DATABASE_URL` at it,
/// migrate and truncate. Runs once per test binary.
async fn prepare_test_db() {
    let _ = dotenvy::dotenv();
    if std::env::var("JWT_SECRET").is_err() {
        std::env::set_var("JWT_SECRET", "pulsato-integration-test-secret");
    }

    let original_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let (base_url, db_name) = original_url
        .rsplit_once('/')
        .expect("DATABASE_URL must contain a database name");
    let test_db_name = format!("{db_name}_test");

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&format!("{base_url}/postgres"))
        .await
        .expect("Failed to connect to postgres admin database");

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&test_db_name)
        .fetch_one(&admin_pool)
        .await
        .expect("Failed to check for test database");
    if !exists {
        sqlx::query(&format!("CREATE DATABASE \"{test_db_name}\""))
            .execute(&admin_pool)
            .await
            .expect("Failed to create test database");
    }
    admin_pool.close().await;

    std::env::set_var("DATABASE_URL", format!("{base_url}/{test_db_name}"));

    let pool = server::db::create_pool();
    server::db::run_migrations(&pool).await;
    sqlx::query(&format!("TRUNCATE {ALL_TABLES} RESTART IDENTITY CASCADE"))
        .execute(&pool)
        .await
        .expect("Failed to truncate test tables");
    pool.close().await;
}

/// A pool on the test database, bound to the calling test's runtime.
pub async fn test_pool() -> Pool<Postgres> {
    INITIALIZED.get_or_init(prepare_test_db).await;
    server::db::create_pool()
}

/// Caller id from the claims `auth_middleware` attached; 401 without them.
#[allow(dead_code)]
async fn whoami(claims: Option<Extension<Claims>>) -> Result<Json<i64>, AppError> {
    claims
        .map(|Extension(claims)| Json(claims.sub))
        .ok_or_else(|| AppError::unauthorized("Authentication required"))
}

/// `/health` plus `/whoami` behind the auth middleware.
#[allow(dead_code)]
pub async fn test_app() -> (Router, Pool<Postgres>) {
    let pool = test_pool().await;
    let state = AppState { pool: pool.clone() };

    let router = Router::new()
        .route("/health", get(server::health::health_check))
        .route("/whoami", get(whoami))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            server::auth::middleware::auth_middleware,
        ))
        .with_state(state);

    (router, pool)
}

/// Email unique across the whole test run.
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@pulsato.test", Uuid::new_v4().simple())
}

#[allow(dead_code)]
pub async fn seed_user(pool: &Pool<Postgres>, prefix: &str) -> i64 {
    server::repo::user::create(pool, &unique_email(prefix), prefix, "not-a-real-hash")
        .await
        .expect("seed user")
        .id
}

/// A fresh company with `user_id` in it.
#[allow(dead_code)]
pub async fn seed_membership(pool: &Pool<Postgres>, user_id: i64, role: CompanyRole) -> Uuid {
    let company_id = server::repo::membership::create_company(pool, "Acme Wellbeing")
        .await
        .expect("seed company");
    server::repo::membership::create(pool, user_id, company_id, role)
        .await
        .expect("seed membership");
    company_id
}

#[allow(dead_code)]
pub async fn seed_analyses(pool: &Pool<Postgres>, user_id: i64, company_id: Option<Uuid>, n: usize) {
    let turns = vec![ChatTurn {
        prompt: "How are you feeling today?".into(),
        answer: "Steady".into(),
    }];
    for i in 0..n {
        let mood = (i % 5 + 1) as i16;
        server::repo::analysis::create(pool, user_id, company_id, mood, "Okay: Steady", &turns)
            .await
            .expect("seed analysis");
    }
}

/// GET `uri` with an optional raw `Cookie` header. Returns status, the
/// `Set-Cookie` values and the body.
#[allow(dead_code)]
pub async fn get_with_cookie(app: &Router, uri: &str, cookie: Option<&str>) -> (StatusCode, Vec<String>, String) {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let set_cookies = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, set_cookies, String::from_utf8(body.to_vec()).unwrap())
}
