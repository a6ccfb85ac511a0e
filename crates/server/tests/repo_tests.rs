//! Postgres-backed tests for the repositories behind the dashboard.
//!
//! Need a reachable `DATABASE_URL`; a `_test` database is created next to it.
//! Run with: `cargo test -p server --features server --test repo_tests`

#![cfg(feature = "server")]

mod common;

use common::{seed_analyses, seed_membership, seed_user, test_pool, unique_email};
use pretty_assertions::assert_eq;
use server::repo;
use shared_types::{AppErrorKind, CompanyRole};

#[tokio::test]
async fn membership_is_absent_for_new_user() {
    let pool = test_pool().await;
    let user_id = seed_user(&pool, "solo").await;

    let membership = repo::membership::find_for_user(&pool, user_id).await.unwrap();
    assert_eq!(membership, None);
}

#[tokio::test]
async fn membership_round_trips_role_and_company() {
    let pool = test_pool().await;
    let user_id = seed_user(&pool, "hr").await;
    let company_id = seed_membership(&pool, user_id, CompanyRole::Hr).await;

    let membership = repo::membership::find_for_user(&pool, user_id)
        .await
        .unwrap()
        .expect("membership");
    assert_eq!(membership.role, CompanyRole::Hr);
    assert_eq!(membership.company_id, Some(company_id));
}

#[tokio::test]
async fn second_membership_for_same_user_conflicts() {
    let pool = test_pool().await;
    let user_id = seed_user(&pool, "twice").await;
    let company_id = seed_membership(&pool, user_id, CompanyRole::Member).await;

    let err = repo::membership::create(&pool, user_id, company_id, CompanyRole::Admin)
        .await
        .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Conflict);
}

#[tokio::test]
async fn personal_and_company_counts() {
    let pool = test_pool().await;
    let admin = seed_user(&pool, "admin").await;
    let company_id = seed_membership(&pool, admin, CompanyRole::Admin).await;
    let colleague = seed_user(&pool, "colleague").await;
    repo::membership::create(&pool, colleague, company_id, CompanyRole::Member)
        .await
        .unwrap();

    seed_analyses(&pool, admin, Some(company_id), 2).await;
    seed_analyses(&pool, colleague, Some(company_id), 3).await;

    assert_eq!(repo::analysis::count_for_user(&pool, admin).await.unwrap(), 2);
    assert_eq!(repo::analysis::count_for_user(&pool, colleague).await.unwrap(), 3);
    assert_eq!(repo::analysis::count_for_company(&pool, company_id).await.unwrap(), 5);
}

#[tokio::test]
async fn count_is_zero_without_records() {
    let pool = test_pool().await;
    let user_id = seed_user(&pool, "fresh").await;
    assert_eq!(repo::analysis::count_for_user(&pool, user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn lists_are_newest_first_and_limited() {
    let pool = test_pool().await;
    let user_id = seed_user(&pool, "history").await;
    seed_analyses(&pool, user_id, None, 4).await;

    let rows = repo::analysis::list_for_user(&pool, user_id, 3).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    assert!(rows.iter().all(|r| r.user_id == user_id && r.company_id.is_none()));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let pool = test_pool().await;
    let email = unique_email("dup");
    repo::user::create(&pool, &email, "First", "hash").await.unwrap();

    let err = repo::user::create(&pool, &email, "Second", "hash").await.unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Conflict);
    assert_eq!(err.message, "An account with this email already exists");
}

#[tokio::test]
async fn credentials_lookup_ignores_email_case() {
    let pool = test_pool().await;
    let email = unique_email("Case");
    let user = repo::user::create(&pool, &email, "Case", "hash").await.unwrap();

    let found = repo::user::find_credentials_by_email(&pool, &email.to_uppercase())
        .await
        .unwrap()
        .expect("credentials");
    assert_eq!(found.id, user.id);
}

#[tokio::test]
async fn refresh_token_is_consumed_once() {
    let pool = test_pool().await;
    let user_id = seed_user(&pool, "rotate").await;
    let expires_at = chrono::Utc::now() + chrono::Duration::days(1);
    repo::refresh_token::store(&pool, user_id, "hash-one", expires_at).await.unwrap();

    assert!(repo::refresh_token::consume(&pool, user_id, "hash-one").await.unwrap());
    assert!(!repo::refresh_token::consume(&pool, user_id, "hash-one").await.unwrap());
}

#[tokio::test]
async fn expired_refresh_token_is_not_consumed() {
    let pool = test_pool().await;
    let user_id = seed_user(&pool, "stale").await;
    let expired = chrono::Utc::now() - chrono::Duration::minutes(1);
    repo::refresh_token::store(&pool, user_id, "hash-stale", expired).await.unwrap();

    assert!(!repo::refresh_token::consume(&pool, user_id, "hash-stale").await.unwrap());
}
