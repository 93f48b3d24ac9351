//! View session model: a time-boxed, revocable grant for one (note, user).

use noteguard_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `view_sessions` table.
///
/// **Note:** `token_hash` is never serialized to responses. Only the HMAC of
/// the view token is stored; the plaintext token exists solely in the
/// issuance response.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ViewSession {
    pub id: DbId,
    pub note_id: DbId,
    pub user_id: DbId,
    #[serde(skip_serializing)]
    pub token_hash: String,
    #[serde(skip_serializing)]
    pub watermark_seed: String,
    pub client_ip: Option<String>,
    pub client_user_agent: Option<String>,
    pub last_seen_at: Timestamp,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO for a new view session.
#[derive(Debug, Clone)]
pub struct CreateViewSession {
    pub note_id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub watermark_seed: String,
    pub client_ip: Option<String>,
    pub client_user_agent: Option<String>,
    pub expires_at: Timestamp,
}

/// Response returned when a session is issued.
/// Includes the plaintext token (shown exactly once, never stored).
#[derive(Debug, Clone, Serialize)]
pub struct IssuedSession {
    pub session_id: DbId,
    /// The full plaintext view token. Shown **once** and never persisted.
    pub view_token: String,
    pub expires_at: Timestamp,
}
