//! Note and file-asset models (external entities, read-only here).
//!
//! These tables are owned by the content CRUD and upload services; the
//! access subsystem reads them to gate and locate content and never writes
//! them.

use noteguard_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    pub subject_id: DbId,
    pub title: String,
    pub is_published: bool,
    pub is_premium: bool,
    pub file_asset_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `file_assets` table: the backing-store locator.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FileAsset {
    pub id: DbId,
    pub object_key: String,
    pub content_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
