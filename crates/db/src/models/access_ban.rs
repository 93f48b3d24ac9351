//! Access-ban model, keyed uniquely by (note, user).

use noteguard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `access_bans` table. A ban is active while `revoked_at`
/// is NULL; unbanning sets it and re-banning clears it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AccessBan {
    pub id: DbId,
    pub note_id: DbId,
    pub user_id: DbId,
    pub reason: Option<String>,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body for the admin ban endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBan {
    pub reason: Option<String>,
}
