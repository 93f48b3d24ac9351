//! Handlers for the `/notes` secure-access surface: session issuance,
//! watermark payloads, and content streaming with HTTP range support.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header::{self, HeaderMap};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use noteguard_core::error::CoreError;
use noteguard_core::range;
use noteguard_core::types::DbId;
use noteguard_core::watermark::{build_signed_watermark, SignedWatermark, WatermarkIdentity};
use noteguard_db::models::access_log::CreateAccessLogEntry;
use noteguard_db::models::view_session::IssuedSession;
use noteguard_db::repositories::{AccessLogRepo, NoteRepo, UserRepo};

use crate::access::{detector, policy, sessions, ClientMeta};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct TokenParams {
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RevokedSessions {
    pub revoked: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/notes/{id}/view-session
///
/// Issues a view session for the caller. The response carries the plaintext
/// view token -- the only time it is ever exposed.
pub async fn create_view_session(
    State(state): State<AppState>,
    Path(note_id): Path<DbId>,
    user: AuthUser,
    headers: HeaderMap,
) -> AppResult<(StatusCode, Json<DataResponse<IssuedSession>>)> {
    let meta = ClientMeta::from_headers(&headers);
    let issued = sessions::issue(&state, note_id, user.user_id, &meta).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: issued })))
}

/// POST /api/v1/notes/{id}/view-session/reset
///
/// Revokes every live session the caller holds for the note. Idempotent.
pub async fn reset_view_sessions(
    State(state): State<AppState>,
    Path(note_id): Path<DbId>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<RevokedSessions>>> {
    let revoked = sessions::reset(&state, note_id, user.user_id).await?;
    Ok(Json(DataResponse {
        data: RevokedSessions { revoked },
    }))
}

/// GET /api/v1/notes/{id}/watermark?token=
///
/// Returns the signed watermark payload bound to the presented session.
/// Ban and token checks are identical to content streaming.
pub async fn get_watermark(
    State(state): State<AppState>,
    Path(note_id): Path<DbId>,
    user: AuthUser,
    Query(params): Query<TokenParams>,
    headers: HeaderMap,
) -> AppResult<Json<DataResponse<SignedWatermark>>> {
    let meta = ClientMeta::from_headers(&headers);
    let token = params.token.unwrap_or_default();
    let session = policy::validate_session(&state, note_id, user.user_id, &token, &meta).await?;

    let viewer = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        })?;

    let identity = WatermarkIdentity {
        display_name: viewer.display_name,
        email: viewer.email,
        phone: viewer.phone,
    };

    let signed = build_signed_watermark(
        &state.signer,
        user.user_id,
        &identity,
        session.id,
        &session.watermark_seed,
    );

    Ok(Json(DataResponse { data: signed }))
}

/// GET /api/v1/notes/{id}/content?token=
///
/// Streams note content with HTTP range support. Without a `Range` header
/// the whole object is served (200); with one, the requested window is
/// served (206) -- open-ended ranges are capped at 1 MiB. Every served
/// request is appended to the access log and then inspected by the anomaly
/// detector.
pub async fn stream_content(
    State(state): State<AppState>,
    Path(note_id): Path<DbId>,
    user: AuthUser,
    Query(params): Query<TokenParams>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let meta = ClientMeta::from_headers(&headers);
    let token = params.token.unwrap_or_default();
    let session = policy::validate_session(&state, note_id, user.user_id, &token, &meta).await?;

    let note = NoteRepo::find_by_id(&state.pool, note_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Note",
            id: note_id,
        })?;
    let asset_id = note.file_asset_id.ok_or(CoreError::NotFound {
        entity: "NoteContent",
        id: note_id,
    })?;

    // Cheap rejection before any storage I/O.
    policy::check_rate_limit(&state, note_id, user.user_id).await?;

    let asset = NoteRepo::find_asset_by_id(&state.pool, asset_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "FileAsset",
            id: asset_id,
        })?;

    let size = state.store.stat(&asset.object_key).await?;

    // Resolve the requested byte window, if any.
    let window = match headers.get(header::RANGE) {
        Some(value) => {
            let range_str = value
                .to_str()
                .map_err(|_| AppError::InvalidRange("Malformed Range header".into()))?;
            let (start, end) = range::parse_range_header(range_str)?;
            Some(range::resolve_window(start, end, size)?)
        }
        None => None,
    };

    let (stream, bytes_sent) = match &window {
        Some(w) => (
            state
                .store
                .read_range(&asset.object_key, w.start, w.length())
                .await?,
            w.length(),
        ),
        None => (state.store.read_full(&asset.object_key).await?, size),
    };

    AccessLogRepo::create(
        &state.pool,
        &CreateAccessLogEntry {
            note_id,
            user_id: user.user_id,
            view_session_id: session.id,
            range_start: window.map(|w| w.start as i64),
            range_end: window.map(|w| w.end as i64),
            bytes_sent: bytes_sent as i64,
            client_ip: meta.ip.clone(),
            client_user_agent: meta.user_agent.clone(),
        },
    )
    .await?;

    // Best-effort: a detector failure never reaches the client.
    detector::detect_range_scrape(&state, note_id, user.user_id).await;

    let mut builder = Response::builder()
        .status(if window.is_some() {
            StatusCode::PARTIAL_CONTENT
        } else {
            StatusCode::OK
        })
        .header(header::CONTENT_TYPE, asset.content_type)
        .header(header::CONTENT_LENGTH, bytes_sent.to_string())
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CACHE_CONTROL, "no-store");

    if let Some(w) = &window {
        builder = builder.header(header::CONTENT_RANGE, w.content_range());
    }

    builder
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::InternalError(e.to_string()))
}
