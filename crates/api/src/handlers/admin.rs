//! Handlers for the `/admin` moderation surface: security-signal review,
//! session revocation, and (note, user) bans.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use noteguard_core::error::CoreError;
use noteguard_core::types::DbId;
use noteguard_db::models::access_ban::{AccessBan, CreateBan};
use noteguard_db::models::security_signal::{SecuritySignal, SignalCount, SignalQuery};
use noteguard_db::models::view_session::ViewSession;
use noteguard_db::repositories::{
    AccessBanRepo, AccessLogRepo, NoteRepo, SecuritySignalRepo, UserRepo, ViewSessionRepo,
};

use crate::error::AppResult;
use crate::handlers::notes::RevokedSessions;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Per-note access overview for moderation review, optionally scoped to a
/// single user.
#[derive(Debug, Serialize)]
pub struct AccessSummary {
    pub note_id: DbId,
    pub user_id: Option<DbId>,
    pub live_sessions: i64,
    pub access_log_entries: i64,
    pub active_bans: i64,
    pub signals: Vec<SignalCount>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub user_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct BanLifted {
    pub lifted: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_note_exists(state: &AppState, note_id: DbId) -> AppResult<()> {
    NoteRepo::find_by_id(&state.pool, note_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Note",
            id: note_id,
        })?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/security-signals
///
/// Lists security signals, newest first, with optional note/user/type
/// filters and pagination.
pub async fn list_security_signals(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filter): Query<SignalQuery>,
) -> AppResult<Json<DataResponse<Vec<SecuritySignal>>>> {
    let signals = SecuritySignalRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: signals }))
}

/// GET /api/v1/admin/notes/{id}/access-summary?user_id=
///
/// Per-note counts: live sessions, access-log rows, active bans, and
/// signals grouped by type. With `user_id` the counts cover just that
/// (note, user) pair.
pub async fn get_access_summary(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(note_id): Path<DbId>,
    Query(params): Query<SummaryParams>,
) -> AppResult<Json<DataResponse<AccessSummary>>> {
    ensure_note_exists(&state, note_id).await?;
    let user_id = params.user_id;

    let summary = AccessSummary {
        note_id,
        user_id,
        live_sessions: ViewSessionRepo::count_live_for_note(&state.pool, note_id, user_id).await?,
        access_log_entries: AccessLogRepo::count_for_note(&state.pool, note_id, user_id).await?,
        active_bans: AccessBanRepo::count_active_for_note(&state.pool, note_id, user_id).await?,
        signals: SecuritySignalRepo::count_by_type_for_note(&state.pool, note_id, user_id)
            .await?,
    };

    Ok(Json(DataResponse { data: summary }))
}

/// DELETE /api/v1/admin/view-sessions/{id}
///
/// Revokes one session by id. Revoking an already-revoked session succeeds.
pub async fn revoke_session(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(session_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ViewSession>>> {
    ViewSessionRepo::find_by_id(&state.pool, session_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ViewSession",
            id: session_id,
        })?;

    // None means the session was already revoked; report the stored row.
    let session = match ViewSessionRepo::revoke(&state.pool, session_id).await? {
        Some(session) => session,
        None => ViewSessionRepo::find_by_id(&state.pool, session_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ViewSession",
                id: session_id,
            })?,
    };

    tracing::info!(
        session_id,
        admin_id = admin.user_id,
        "Admin revoked view session"
    );

    Ok(Json(DataResponse { data: session }))
}

/// POST /api/v1/admin/notes/{id}/view-sessions/revoke
///
/// Revokes every live session for a note, across all users.
pub async fn revoke_note_sessions(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(note_id): Path<DbId>,
) -> AppResult<Json<DataResponse<RevokedSessions>>> {
    ensure_note_exists(&state, note_id).await?;

    let revoked = ViewSessionRepo::revoke_all_for_note(&state.pool, note_id).await?;
    tracing::info!(
        note_id,
        revoked,
        admin_id = admin.user_id,
        "Admin revoked all sessions for note"
    );

    Ok(Json(DataResponse {
        data: RevokedSessions { revoked },
    }))
}

/// PUT /api/v1/admin/notes/{note_id}/bans/{user_id}
///
/// Bans a (note, user) pair. Re-banning an already-banned pair reactivates
/// the existing ban and updates the reason.
pub async fn ban_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((note_id, user_id)): Path<(DbId, DbId)>,
    Json(body): Json<CreateBan>,
) -> AppResult<Json<DataResponse<AccessBan>>> {
    ensure_note_exists(&state, note_id).await?;
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;

    let ban =
        AccessBanRepo::upsert_ban(&state.pool, note_id, user_id, body.reason.as_deref()).await?;

    tracing::info!(
        note_id,
        user_id,
        admin_id = admin.user_id,
        "Admin banned user for note"
    );

    Ok(Json(DataResponse { data: ban }))
}

/// DELETE /api/v1/admin/notes/{note_id}/bans/{user_id}
///
/// Lifts a ban. Un-banning an already-unbanned pair succeeds with
/// `lifted: false`.
pub async fn unban_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((note_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<BanLifted>>> {
    let lifted = AccessBanRepo::revoke_ban(&state.pool, note_id, user_id)
        .await?
        .is_some();

    tracing::info!(
        note_id,
        user_id,
        lifted,
        admin_id = admin.user_id,
        "Admin lifted ban"
    );

    Ok(Json(DataResponse {
        data: BanLifted { lifted },
    }))
}
