//! Read-only repository for the `notes` and `file_assets` tables.
//!
//! The access subsystem never writes these: both are owned by the content
//! CRUD and upload services.

use noteguard_core::types::DbId;
use sqlx::PgPool;

use crate::models::note::{FileAsset, Note};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const NOTE_COLUMNS: &str = "\
    id, subject_id, title, is_published, is_premium, file_asset_id, \
    created_at, updated_at";

const ASSET_COLUMNS: &str = "id, object_key, content_type, created_at, updated_at";

/// Read-side queries for notes and their backing file assets.
pub struct NoteRepo;

impl NoteRepo {
    /// Find a note by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a file asset by its ID.
    pub async fn find_asset_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FileAsset>, sqlx::Error> {
        let query = format!("SELECT {ASSET_COLUMNS} FROM file_assets WHERE id = $1");
        sqlx::query_as::<_, FileAsset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
