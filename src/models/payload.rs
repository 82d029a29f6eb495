use crate::{janitor::Stats, notice::Notice};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub version: String,
    pub started_at: Option<DateTime<Utc>>,
    pub vault_root: String,
    pub trash_mode: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JanitorStatus {
    pub running: bool,
    pub check_interval: u32,
    pub next_run: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub stats: Stats,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Swept {
    pub deleted: Vec<String>,
}
