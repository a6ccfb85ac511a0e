//! Session middleware tests against a real database.
//!
//! Run with: `cargo test -p server --features server --test auth_tests`

#![cfg(feature = "server")]

mod common;

use axum::http::StatusCode;
use common::{get_with_cookie, seed_user, test_app};
use server::auth::jwt;
use server::repo;

#[tokio::test]
async fn health_reports_database() {
    let (app, _pool) = test_app().await;
    let (status, _, body) = get_with_cookie(&app, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db"], "connected");
}

#[tokio::test]
async fn anonymous_request_is_unauthorized() {
    let (app, _pool) = test_app().await;
    let (status, set_cookies, _) = get_with_cookie(&app, "/whoami", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(set_cookies.is_empty());
}

#[tokio::test]
async fn access_cookie_identifies_caller() {
    let (app, pool) = test_app().await;
    let user_id = seed_user(&pool, "cookie").await;
    let access = jwt::create_access_token(user_id, "cookie@pulsato.test").unwrap();

    let cookie = format!("pulsato_access={access}");
    let (status, set_cookies, body) = get_with_cookie(&app, "/whoami", Some(&cookie)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, user_id.to_string());
    assert!(set_cookies.is_empty());
}

#[tokio::test]
async fn refresh_cookie_rotates_session() {
    let (app, pool) = test_app().await;
    let user_id = seed_user(&pool, "refresh").await;
    let (refresh, expires_at) = jwt::create_refresh_token(user_id, "refresh@pulsato.test").unwrap();
    repo::refresh_token::store(&pool, user_id, &jwt::hash_token(&refresh), expires_at)
        .await
        .unwrap();

    let cookie = format!("pulsato_refresh={refresh}");
    let (status, set_cookies, body) = get_with_cookie(&app, "/whoami", Some(&cookie)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, user_id.to_string());
    assert!(set_cookies.iter().any(|c| c.starts_with("pulsato_access=")));
    assert!(set_cookies.iter().any(|c| c.starts_with("pulsato_refresh=")));

    // The old refresh token is spent.
    let (status, _, _) = get_with_cookie(&app, "/whoami", Some(&cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_refresh_token_is_ignored() {
    let (app, pool) = test_app().await;
    let user_id = seed_user(&pool, "forged").await;
    let (refresh, _) = jwt::create_refresh_token(user_id, "forged@pulsato.test").unwrap();

    let cookie = format!("pulsato_refresh={refresh}");
    let (status, set_cookies, _) = get_with_cookie(&app, "/whoami", Some(&cookie)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(set_cookies.is_empty());
}
