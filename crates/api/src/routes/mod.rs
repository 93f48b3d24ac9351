//! Route definitions.

pub mod admin;
pub mod health;
pub mod notes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /notes/{id}/view-session              issue session (POST, auth)
/// /notes/{id}/view-session/reset        revoke caller's sessions (POST, auth)
/// /notes/{id}/watermark                 signed watermark payload (GET, auth + token)
/// /notes/{id}/content                   streamed bytes, range-aware (GET, auth + token)
///
/// /admin/security-signals                  list signals (GET, admin)
/// /admin/notes/{note_id}/access-summary    per-note overview (GET, admin)
/// /admin/view-sessions/{id}                revoke one session (DELETE, admin)
/// /admin/notes/{note_id}/view-sessions/revoke  revoke all for note (POST, admin)
/// /admin/notes/{note_id}/bans/{user_id}    ban (PUT) / unban (DELETE, admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/notes", notes::router())
        .nest("/admin", admin::router())
}
