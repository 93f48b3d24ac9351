//! View-session issuance and revocation.

use chrono::{Duration, Utc};
use noteguard_core::error::CoreError;
use noteguard_core::signer::{generate_view_token, generate_watermark_seed};
use noteguard_core::types::DbId;
use noteguard_db::models::view_session::{CreateViewSession, IssuedSession};
use noteguard_db::repositories::{AccessBanRepo, NoteRepo, ViewSessionRepo};

use super::ClientMeta;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Issue a view session for (note, user).
///
/// Gate order: note exists and is published, no active ban, entitlement for
/// premium notes, live-session cap. Only after all gates pass is a token
/// generated; its plaintext leaves this function exactly once, in the
/// returned [`IssuedSession`].
pub async fn issue(
    state: &AppState,
    note_id: DbId,
    user_id: DbId,
    meta: &ClientMeta,
) -> AppResult<IssuedSession> {
    let note = NoteRepo::find_by_id(&state.pool, note_id)
        .await?
        .filter(|n| n.is_published)
        .ok_or(CoreError::NotFound {
            entity: "Note",
            id: note_id,
        })?;

    if AccessBanRepo::find_active(&state.pool, note_id, user_id)
        .await?
        .is_some()
    {
        return Err(AppError::access_banned());
    }

    if note.is_premium && !state.entitlements.can_access_note(user_id, &note).await {
        return Err(AppError::premium_locked());
    }

    let cap = state.config.access.session_cap;
    let live = ViewSessionRepo::count_live_for_user(&state.pool, note_id, user_id).await?;
    if live >= cap {
        return Err(AppError::session_limit(cap));
    }

    let token = generate_view_token();
    let expires_at = Utc::now() + Duration::minutes(state.config.access.session_ttl_mins);

    let session = ViewSessionRepo::create(
        &state.pool,
        &CreateViewSession {
            note_id,
            user_id,
            token_hash: state.signer.sign(token.as_bytes()),
            watermark_seed: generate_watermark_seed(),
            client_ip: meta.ip.clone(),
            client_user_agent: meta.user_agent.clone(),
            expires_at,
        },
    )
    .await?;

    tracing::info!(note_id, user_id, session_id = session.id, "Issued view session");

    Ok(IssuedSession {
        session_id: session.id,
        view_token: token,
        expires_at: session.expires_at,
    })
}

/// Revoke every live session the caller holds for a note.
/// Idempotent: revoking when none are live succeeds with a count of zero.
pub async fn reset(state: &AppState, note_id: DbId, user_id: DbId) -> AppResult<u64> {
    let revoked = ViewSessionRepo::revoke_all_for_user(&state.pool, note_id, user_id).await?;
    tracing::info!(note_id, user_id, revoked, "Reset view sessions");
    Ok(revoked)
}
