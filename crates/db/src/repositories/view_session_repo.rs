//! Repository for the `view_sessions` table.
//!
//! Sessions are append-only in lifecycle: rows are never deleted, they end
//! by `revoked_at` being set or `expires_at` elapsing. "Live" below always
//! means `revoked_at IS NULL AND expires_at > NOW()`.

use noteguard_core::types::DbId;
use sqlx::PgPool;

use crate::models::view_session::{CreateViewSession, ViewSession};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const COLUMNS: &str = "\
    id, note_id, user_id, token_hash, watermark_seed, client_ip, \
    client_user_agent, last_seen_at, expires_at, revoked_at, created_at, \
    updated_at";

/// Provides issuance, lookup, and revocation for view sessions.
pub struct ViewSessionRepo;

impl ViewSessionRepo {
    /// Persist a new session. `token_hash` must already be the signed form;
    /// the plaintext token never reaches this layer.
    pub async fn create(
        pool: &PgPool,
        input: &CreateViewSession,
    ) -> Result<ViewSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO view_sessions \
                (note_id, user_id, token_hash, watermark_seed, client_ip, \
                 client_user_agent, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ViewSession>(&query)
            .bind(input.note_id)
            .bind(input.user_id)
            .bind(&input.token_hash)
            .bind(&input.watermark_seed)
            .bind(&input.client_ip)
            .bind(&input.client_user_agent)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a session by its ID (live or not).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ViewSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM view_sessions WHERE id = $1");
        sqlx::query_as::<_, ViewSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All live sessions for a (note, user) pair, newest first.
    ///
    /// Token lookup linear-scans this set: the stored hash is one-way, so no
    /// equality index on the raw token can exist, and the set is bounded by
    /// the session cap.
    pub async fn find_live_for_user(
        pool: &PgPool,
        note_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<ViewSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM view_sessions \
             WHERE note_id = $1 AND user_id = $2 \
               AND revoked_at IS NULL AND expires_at > NOW() \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ViewSession>(&query)
            .bind(note_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Count live sessions for a (note, user) pair.
    pub async fn count_live_for_user(
        pool: &PgPool,
        note_id: DbId,
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM view_sessions \
             WHERE note_id = $1 AND user_id = $2 \
               AND revoked_at IS NULL AND expires_at > NOW()",
        )
        .bind(note_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Count live sessions for a note, optionally scoped to one user.
    pub async fn count_live_for_note(
        pool: &PgPool,
        note_id: DbId,
        user_id: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM view_sessions \
             WHERE note_id = $1 \
               AND ($2::BIGINT IS NULL OR user_id = $2) \
               AND revoked_at IS NULL AND expires_at > NOW()",
        )
        .bind(note_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Update `last_seen_at` to the current timestamp.
    pub async fn touch_last_seen(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE view_sessions SET last_seen_at = NOW(), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Revoke one session. Returns the updated row, or `None` when the
    /// session was already revoked (callers treat that as success).
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<Option<ViewSession>, sqlx::Error> {
        let query = format!(
            "UPDATE view_sessions SET revoked_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND revoked_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ViewSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Revoke every unrevoked session for a (note, user) pair.
    /// Returns the number of rows affected.
    pub async fn revoke_all_for_user(
        pool: &PgPool,
        note_id: DbId,
        user_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE view_sessions SET revoked_at = NOW(), updated_at = NOW() \
             WHERE note_id = $1 AND user_id = $2 AND revoked_at IS NULL",
        )
        .bind(note_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Revoke every unrevoked session for a note, across all users.
    pub async fn revoke_all_for_note(pool: &PgPool, note_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE view_sessions SET revoked_at = NOW(), updated_at = NOW() \
             WHERE note_id = $1 AND revoked_at IS NULL",
        )
        .bind(note_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
