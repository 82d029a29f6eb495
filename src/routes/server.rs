use crate::{models::payload::ServerInfo, state::AppState, vars::STARTED_AT};
use axum::{Json, extract::State};
use std::sync::Arc;

pub async fn info(State(state): State<Arc<AppState>>) -> Json<ServerInfo> {
    Json(ServerInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: STARTED_AT.get().cloned(),
        vault_root: state.vault_root.clone(),
        trash_mode: state.trash_mode.to_string(),
    })
}
