use crate::{
    errors::Result, models::params::SettingsPatch, settings::Settings, state::AppState,
};
use axum::{Json, extract::State};
use std::sync::Arc;

pub async fn get(State(state): State<Arc<AppState>>) -> Json<Settings> {
    Json(state.settings.snapshot().await)
}

pub async fn patch(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<Settings>> {
    Ok(Json(state.change(patch).await?))
}

pub async fn reset(State(state): State<Arc<AppState>>) -> Result<Json<Settings>> {
    Ok(Json(state.reset().await?))
}
