//! Repository for the `access_bans` table, keyed uniquely by (note, user).

use noteguard_core::types::DbId;
use sqlx::PgPool;

use crate::models::access_ban::AccessBan;

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const COLUMNS: &str = "id, note_id, user_id, reason, revoked_at, created_at, updated_at";

/// Provides ban/unban and lookup operations for access bans.
pub struct AccessBanRepo;

impl AccessBanRepo {
    /// Ban a (note, user) pair. Banning an already-banned pair clears
    /// `revoked_at` and updates the reason; both paths are idempotent.
    pub async fn upsert_ban(
        pool: &PgPool,
        note_id: DbId,
        user_id: DbId,
        reason: Option<&str>,
    ) -> Result<AccessBan, sqlx::Error> {
        let query = format!(
            "INSERT INTO access_bans (note_id, user_id, reason) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (note_id, user_id) DO UPDATE \
                 SET revoked_at = NULL, \
                     reason = EXCLUDED.reason, \
                     updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AccessBan>(&query)
            .bind(note_id)
            .bind(user_id)
            .bind(reason)
            .fetch_one(pool)
            .await
    }

    /// Lift a ban by setting `revoked_at`. Returns `None` when no active ban
    /// existed (callers treat that as success).
    pub async fn revoke_ban(
        pool: &PgPool,
        note_id: DbId,
        user_id: DbId,
    ) -> Result<Option<AccessBan>, sqlx::Error> {
        let query = format!(
            "UPDATE access_bans SET revoked_at = NOW(), updated_at = NOW() \
             WHERE note_id = $1 AND user_id = $2 AND revoked_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AccessBan>(&query)
            .bind(note_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// The active ban for a (note, user) pair, if any.
    pub async fn find_active(
        pool: &PgPool,
        note_id: DbId,
        user_id: DbId,
    ) -> Result<Option<AccessBan>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM access_bans \
             WHERE note_id = $1 AND user_id = $2 AND revoked_at IS NULL"
        );
        sqlx::query_as::<_, AccessBan>(&query)
            .bind(note_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Count active bans for a note, optionally scoped to one user.
    pub async fn count_active_for_note(
        pool: &PgPool,
        note_id: DbId,
        user_id: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM access_bans \
             WHERE note_id = $1 \
               AND ($2::BIGINT IS NULL OR user_id = $2) \
               AND revoked_at IS NULL",
        )
        .bind(note_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
