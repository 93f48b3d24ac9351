//! User model (external entity, read-only here).
//!
//! Owned by the identity service; read only for watermark identity fields
//! and role checks.

use noteguard_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Known role names stored in `users.role`.
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const STUDENT: &str = "student";
}

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub email: String,
    #[serde(skip_serializing)]
    pub phone: Option<String>,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
