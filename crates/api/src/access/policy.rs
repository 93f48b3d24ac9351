//! Session validation and rate limiting -- the decision layer consulted
//! before any byte is read from storage.

use chrono::{Duration, Utc};
use noteguard_core::types::DbId;
use noteguard_db::models::security_signal::signal_types;
use noteguard_db::models::view_session::ViewSession;
use noteguard_db::repositories::{AccessBanRepo, AccessLogRepo, ViewSessionRepo};

use super::{emit_signal, ClientMeta};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Validate a presented view token for (note, user).
///
/// The stored hash is one-way, so lookup linear-scans the caller's live
/// sessions (bounded by the session cap) comparing `sign(candidate)` against
/// each stored hash. A fingerprint mismatch on the matched session emits a
/// TOKEN_REUSE signal but does not deny access: IP and user-agent drift has
/// legitimate causes (mobile networks, browser updates).
pub async fn validate_session(
    state: &AppState,
    note_id: DbId,
    user_id: DbId,
    token: &str,
    meta: &ClientMeta,
) -> AppResult<ViewSession> {
    if token.is_empty() {
        return Err(AppError::BadRequest("Missing view token".into()));
    }

    // Bans can postdate the session, so re-check on every validation.
    if AccessBanRepo::find_active(&state.pool, note_id, user_id)
        .await?
        .is_some()
    {
        return Err(AppError::access_banned());
    }

    let sessions = ViewSessionRepo::find_live_for_user(&state.pool, note_id, user_id).await?;

    let session = sessions
        .into_iter()
        .find(|s| state.signer.verify(token.as_bytes(), &s.token_hash))
        .ok_or_else(AppError::session_invalid)?;

    let recorded = ClientMeta {
        ip: session.client_ip.clone(),
        user_agent: session.client_user_agent.clone(),
    };
    if recorded != *meta {
        emit_signal(
            &state.pool,
            note_id,
            Some(user_id),
            signal_types::TOKEN_REUSE,
            serde_json::json!({
                "session_id": session.id,
                "recorded_ip": recorded.ip,
                "observed_ip": meta.ip,
                "recorded_user_agent": recorded.user_agent,
                "observed_user_agent": meta.user_agent,
            }),
        )
        .await;
    }

    ViewSessionRepo::touch_last_seen(&state.pool, session.id).await?;

    Ok(session)
}

/// Enforce the sliding-window rate limit for (note, user).
///
/// Runs per content request after session validation and before storage
/// I/O, so abusive clients are rejected cheaply. Reaching the limit emits a
/// RATE_LIMIT signal and denies the request.
pub async fn check_rate_limit(state: &AppState, note_id: DbId, user_id: DbId) -> AppResult<()> {
    let window_secs = state.config.access.rate_limit_window_secs;
    let limit = state.config.access.rate_limit_max;

    let cutoff = Utc::now() - Duration::seconds(window_secs);
    let count = AccessLogRepo::count_since(&state.pool, note_id, user_id, cutoff).await?;

    if count >= limit {
        emit_signal(
            &state.pool,
            note_id,
            Some(user_id),
            signal_types::RATE_LIMIT,
            serde_json::json!({
                "count": count,
                "limit": limit,
                "window_secs": window_secs,
            }),
        )
        .await;
        return Err(AppError::rate_limited());
    }

    Ok(())
}
