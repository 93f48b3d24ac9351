//! Anomaly detection over the access-log tail.
//!
//! Runs synchronously after each logged access, best-effort: a detector
//! failure is logged and never reaches the client.

use chrono::{Duration, Utc};
use noteguard_core::anomaly::{
    is_sequential_scrape, RangeSample, SCRAPE_SAMPLE_SIZE, SCRAPE_WINDOW_SECS,
};
use noteguard_core::types::DbId;
use noteguard_db::models::security_signal::signal_types;
use noteguard_db::repositories::AccessLogRepo;

use super::emit_signal;
use crate::state::AppState;

/// Inspect the recent access-log tail for (note, user) and record a
/// RANGE_SCRAPE signal when it matches the sequential-download pattern.
/// Never fails the caller.
pub async fn detect_range_scrape(state: &AppState, note_id: DbId, user_id: DbId) {
    if let Err(err) = detect_inner(state, note_id, user_id).await {
        tracing::warn!(
            note_id,
            user_id,
            error = %err,
            "Range-scrape detection failed"
        );
    }
}

async fn detect_inner(
    state: &AppState,
    note_id: DbId,
    user_id: DbId,
) -> Result<(), sqlx::Error> {
    let cutoff = Utc::now() - Duration::seconds(SCRAPE_WINDOW_SECS);
    let recent = AccessLogRepo::recent_since(
        &state.pool,
        note_id,
        user_id,
        cutoff,
        SCRAPE_SAMPLE_SIZE,
    )
    .await?;

    // Fetched newest-first; the heuristic wants chronological order.
    let samples: Vec<RangeSample> = recent
        .iter()
        .rev()
        .map(|entry| RangeSample {
            range_start: entry.range_start,
            range_end: entry.range_end,
        })
        .collect();

    if is_sequential_scrape(&samples) {
        tracing::warn!(note_id, user_id, count = samples.len(), "Sequential range scrape detected");
        emit_signal(
            &state.pool,
            note_id,
            Some(user_id),
            signal_types::RANGE_SCRAPE,
            serde_json::json!({
                "count": samples.len(),
                "window_secs": SCRAPE_WINDOW_SECS,
            }),
        )
        .await;
    }

    Ok(())
}
