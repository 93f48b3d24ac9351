//! Shared fixtures for db integration tests.
//!
//! The catalog tables (`users`, `notes`, `file_assets`) are owned by
//! external services and have no write repositories here, so fixtures
//! insert rows directly.

use noteguard_core::types::DbId;
use sqlx::PgPool;

pub async fn insert_user(pool: &PgPool, display_name: &str, email: &str) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO users (display_name, email, phone) VALUES ($1, $2, '+15551234567') \
         RETURNING id",
    )
    .bind(display_name)
    .bind(email)
    .fetch_one(pool)
    .await
    .expect("user fixture insert")
}

pub async fn insert_note(pool: &PgPool, title: &str, file_asset_id: Option<DbId>) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO notes (subject_id, title, is_published, is_premium, file_asset_id) \
         VALUES (1, $1, TRUE, FALSE, $2) \
         RETURNING id",
    )
    .bind(title)
    .bind(file_asset_id)
    .fetch_one(pool)
    .await
    .expect("note fixture insert")
}
