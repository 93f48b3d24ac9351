//! Route definitions for the secure note-access surface.
//!
//! Mounted at `/notes`.
//!
//! ```text
//! POST /{id}/view-session          create_view_session
//! POST /{id}/view-session/reset    reset_view_sessions
//! GET  /{id}/watermark             get_watermark
//! GET  /{id}/content               stream_content (range-aware)
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notes;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/view-session", post(notes::create_view_session))
        .route("/{id}/view-session/reset", post(notes::reset_view_sessions))
        .route("/{id}/watermark", get(notes::get_watermark))
        .route("/{id}/content", get(notes::stream_content))
}
