//! Repository for the `access_log` table (append-only audit trail).

use noteguard_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::access_log::{AccessLogEntry, CreateAccessLogEntry};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const COLUMNS: &str = "\
    id, note_id, user_id, view_session_id, range_start, range_end, \
    bytes_sent, client_ip, client_user_agent, created_at";

/// Provides insert and window queries for the access log.
pub struct AccessLogRepo;

impl AccessLogRepo {
    /// Append one log row for a served request.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAccessLogEntry,
    ) -> Result<AccessLogEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO access_log \
                (note_id, user_id, view_session_id, range_start, range_end, \
                 bytes_sent, client_ip, client_user_agent) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AccessLogEntry>(&query)
            .bind(input.note_id)
            .bind(input.user_id)
            .bind(input.view_session_id)
            .bind(input.range_start)
            .bind(input.range_end)
            .bind(input.bytes_sent)
            .bind(&input.client_ip)
            .bind(&input.client_user_agent)
            .fetch_one(pool)
            .await
    }

    /// Count log rows for a (note, user) pair since `cutoff`.
    /// Backs the sliding-window rate limit.
    pub async fn count_since(
        pool: &PgPool,
        note_id: DbId,
        user_id: DbId,
        cutoff: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM access_log \
             WHERE note_id = $1 AND user_id = $2 AND created_at > $3",
        )
        .bind(note_id)
        .bind(user_id)
        .bind(cutoff)
        .fetch_one(pool)
        .await
    }

    /// The most recent `limit` rows for a (note, user) pair since `cutoff`,
    /// newest first. Backs the range-scrape heuristic.
    pub async fn recent_since(
        pool: &PgPool,
        note_id: DbId,
        user_id: DbId,
        cutoff: Timestamp,
        limit: i64,
    ) -> Result<Vec<AccessLogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM access_log \
             WHERE note_id = $1 AND user_id = $2 AND created_at > $3 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $4"
        );
        sqlx::query_as::<_, AccessLogEntry>(&query)
            .bind(note_id)
            .bind(user_id)
            .bind(cutoff)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Total log rows for a note, optionally scoped to one user.
    pub async fn count_for_note(
        pool: &PgPool,
        note_id: DbId,
        user_id: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM access_log \
             WHERE note_id = $1 AND ($2::BIGINT IS NULL OR user_id = $2)",
        )
        .bind(note_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
