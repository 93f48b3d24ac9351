//! Access-log model: one row per served content request (append-only).

use noteguard_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `access_log` table. `range_start`/`range_end` are `None`
/// for full (non-range) responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AccessLogEntry {
    pub id: DbId,
    pub note_id: DbId,
    pub user_id: DbId,
    pub view_session_id: DbId,
    pub range_start: Option<i64>,
    pub range_end: Option<i64>,
    pub bytes_sent: i64,
    pub client_ip: Option<String>,
    pub client_user_agent: Option<String>,
    pub created_at: Timestamp,
}

/// Insert DTO for a served request.
#[derive(Debug, Clone)]
pub struct CreateAccessLogEntry {
    pub note_id: DbId,
    pub user_id: DbId,
    pub view_session_id: DbId,
    pub range_start: Option<i64>,
    pub range_end: Option<i64>,
    pub bytes_sent: i64,
    pub client_ip: Option<String>,
    pub client_user_agent: Option<String>,
}
