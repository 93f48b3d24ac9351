//! Security-signal model: immutable records of suspicious access patterns.

use noteguard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Known signal type names stored in `security_signals.signal_type`.
pub mod signal_types {
    /// A valid token presented from a client fingerprint (IP / user agent)
    /// other than the one the session was issued to.
    pub const TOKEN_REUSE: &str = "TOKEN_REUSE";
    /// The per-(note, user) request rate limit was reached.
    pub const RATE_LIMIT: &str = "RATE_LIMIT";
    /// Sequential byte-contiguous range requests (bulk-scrape pattern).
    pub const RANGE_SCRAPE: &str = "RANGE_SCRAPE";
}

/// A row from the `security_signals` table (append-only, never updated).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SecuritySignal {
    pub id: DbId,
    pub note_id: DbId,
    pub user_id: Option<DbId>,
    pub signal_type: String,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}

/// Filter for the admin signal listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignalQuery {
    pub note_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub signal_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Per-type signal count for a note, used in access summaries.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SignalCount {
    pub signal_type: String,
    pub count: i64,
}
