//! Route definitions for the admin moderation surface.
//!
//! Mounted at `/admin`; every handler requires the `admin` role.
//!
//! ```text
//! GET    /security-signals                       list_security_signals
//! GET    /notes/{note_id}/access-summary         get_access_summary
//! DELETE /view-sessions/{id}                     revoke_session
//! POST   /notes/{note_id}/view-sessions/revoke   revoke_note_sessions
//! PUT    /notes/{note_id}/bans/{user_id}         ban_user
//! DELETE /notes/{note_id}/bans/{user_id}         unban_user
//! ```

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/security-signals", get(admin::list_security_signals))
        .route(
            "/notes/{note_id}/access-summary",
            get(admin::get_access_summary),
        )
        .route("/view-sessions/{id}", delete(admin::revoke_session))
        .route(
            "/notes/{note_id}/view-sessions/revoke",
            post(admin::revoke_note_sessions),
        )
        .route(
            "/notes/{note_id}/bans/{user_id}",
            put(admin::ban_user).delete(admin::unban_user),
        )
}
