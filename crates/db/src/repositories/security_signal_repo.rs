//! Repository for the `security_signals` table (append-only).

use noteguard_core::types::DbId;
use sqlx::PgPool;

use crate::models::security_signal::{SecuritySignal, SignalCount, SignalQuery};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const COLUMNS: &str = "id, note_id, user_id, signal_type, metadata, created_at";

/// Default and maximum page sizes for the admin listing.
const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

/// Provides insert and moderation queries for security signals.
pub struct SecuritySignalRepo;

impl SecuritySignalRepo {
    /// Append one signal. Signals are never updated or deleted.
    pub async fn create(
        pool: &PgPool,
        note_id: DbId,
        user_id: Option<DbId>,
        signal_type: &str,
        metadata: &serde_json::Value,
    ) -> Result<SecuritySignal, sqlx::Error> {
        let query = format!(
            "INSERT INTO security_signals (note_id, user_id, signal_type, metadata) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SecuritySignal>(&query)
            .bind(note_id)
            .bind(user_id)
            .bind(signal_type)
            .bind(metadata)
            .fetch_one(pool)
            .await
    }

    /// List signals for moderation review, newest first, with optional
    /// note/user/type filters and pagination.
    pub async fn list(
        pool: &PgPool,
        filter: &SignalQuery,
    ) -> Result<Vec<SecuritySignal>, sqlx::Error> {
        let limit = filter.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = filter.offset.unwrap_or(0).max(0);

        let query = format!(
            "SELECT {COLUMNS} FROM security_signals \
             WHERE ($1::BIGINT IS NULL OR note_id = $1) \
               AND ($2::BIGINT IS NULL OR user_id = $2) \
               AND ($3::TEXT IS NULL OR signal_type = $3) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, SecuritySignal>(&query)
            .bind(filter.note_id)
            .bind(filter.user_id)
            .bind(&filter.signal_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Signal counts grouped by type for one note, optionally scoped to one
    /// user.
    pub async fn count_by_type_for_note(
        pool: &PgPool,
        note_id: DbId,
        user_id: Option<DbId>,
    ) -> Result<Vec<SignalCount>, sqlx::Error> {
        sqlx::query_as::<_, SignalCount>(
            "SELECT signal_type, COUNT(*) AS count FROM security_signals \
             WHERE note_id = $1 AND ($2::BIGINT IS NULL OR user_id = $2) \
             GROUP BY signal_type \
             ORDER BY signal_type",
        )
        .bind(note_id)
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
