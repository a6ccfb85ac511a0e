//! Pool bootstrap against a real database.
//!
//! Run with: `cargo test -p server --features server --test db_tests`

#![cfg(feature = "server")]

mod common;

use common::test_pool;

#[tokio::test]
async fn concurrent_first_callers_see_migrated_schema() {
    // Points DATABASE_URL at the prepared test database.
    test_pool().await;

    let (a, b, c) = tokio::join!(server::db::get_db(), server::db::get_db(), server::db::get_db());

    for pool in [a, b, c] {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conversation_analyses")
            .fetch_one(pool)
            .await
            .expect("migrated table should exist");
        assert!(count >= 0);
    }
    assert!(std::ptr::eq(a, b) && std::ptr::eq(b, c));
}
