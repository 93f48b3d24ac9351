//! The access-policy layer: session issuance, validation, rate limiting,
//! and anomaly detection.
//!
//! Everything here runs between the HTTP handlers and the repositories.
//! Security-signal writes are best-effort side effects: a failed write is
//! logged and never alters the outcome of the triggering request.

pub mod detector;
pub mod policy;
pub mod sessions;

use axum::http::HeaderMap;
use noteguard_core::types::DbId;
use noteguard_db::repositories::SecuritySignalRepo;
use sqlx::PgPool;

/// Client fingerprint captured per request, used for session binding and
/// token-reuse detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMeta {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientMeta {
    /// Extract the fingerprint from request headers. The service runs behind
    /// a proxy, so the client IP is the first `x-forwarded-for` hop.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let ip = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let user_agent = headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
            .filter(|v| !v.is_empty());

        Self { ip, user_agent }
    }
}

/// Append a security signal, swallowing and logging any failure.
pub(crate) async fn emit_signal(
    pool: &PgPool,
    note_id: DbId,
    user_id: Option<DbId>,
    signal_type: &str,
    metadata: serde_json::Value,
) {
    if let Err(err) = SecuritySignalRepo::create(pool, note_id, user_id, signal_type, &metadata).await
    {
        tracing::warn!(
            note_id,
            user_id,
            signal_type,
            error = %err,
            "Failed to record security signal"
        );
    }
}
