use crate::{
    errors::Result,
    models::payload::{JanitorStatus, Swept},
    state::AppState,
};
use axum::{Json, extract::State};
use std::sync::Arc;

/// Runs one sweep right away, subject to the same gates as a scheduled one.
pub async fn sweep(State(state): State<Arc<AppState>>) -> Result<Json<Swept>> {
    let deleted = state.janitor.run().await?;

    Ok(Json(Swept { deleted }))
}

pub async fn status(State(state): State<Arc<AppState>>) -> Result<Json<JanitorStatus>> {
    let next_run = state.scheduler.next_run().await?;

    Ok(Json(JanitorStatus {
        running: state.scheduler.is_running().await,
        check_interval: state.settings.snapshot().await.check_interval,
        next_run,
        stats: state.janitor.stats().await,
        notices: state.notices.recent(),
    }))
}
