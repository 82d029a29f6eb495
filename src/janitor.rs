use chrono::{DateTime, Utc};
use log::{debug, error, info};
use serde::Serialize;
use std::sync::Arc;
use tokio::{sync::Mutex, task::spawn_blocking};

use crate::{
    errors::{Error, Result},
    notice::Notifier,
    settings::{Settings, SettingsStore},
    vault::{Entry, Vault, normalize_path},
};

pub const MARKDOWN_EXTENSION: &str = "md";

pub const UNCONFIRMED_NOTICE: &str =
    "File cleanup deletes files automatically, check the settings and confirm before it runs";

/// Strictly older than the TTL.
pub fn is_expired(ctime: i64, now: i64, ttl_millis: i64) -> bool {
    now - ctime > ttl_millis
}

/// Trashes the expired markdown files directly inside the target folder.
///
/// Does nothing unless the scheduler is enabled and the user confirmed
/// automatic deletion. A missing target folder is silently ignored. The
/// first failing trash aborts the sweep and is returned to the caller.
pub fn sweep(
    settings: &Settings,
    vault: &dyn Vault,
    notifier: &dyn Notifier,
    now: i64,
) -> Result<Vec<String>> {
    if settings.check_interval == 0 {
        return Ok(vec![]);
    }
    if !settings.confirmed {
        notifier.notice(UNCONFIRMED_NOTICE);
        return Ok(vec![]);
    }

    let target = normalize_path(&settings.target_folder);
    let folder = match vault.resolve(&target) {
        Some(Entry::Folder(folder)) => folder,
        _ => {
            debug!("Target folder {target} does not exist, nothing to sweep");
            return Ok(vec![]);
        }
    };

    let ttl_millis = settings.ttl_millis();
    let mut deleted = vec![];
    for entry in vault.children(&folder)? {
        let Entry::File(file) = entry else {
            continue;
        };
        if file.extension == MARKDOWN_EXTENSION && is_expired(file.ctime, now, ttl_millis) {
            vault.trash(&file)?;
            debug!("Trashed expired file: {}", file.path);
            deleted.push(file.path);
        }
    }

    if !deleted.is_empty() {
        notifier.notice(&format!("Deleted expired files:\n{}", deleted.join("\n")));
    }

    Ok(deleted)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    // 累计清理总数
    pub cleaned_total: usize,
    pub last_run: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Runs sweeps against the shared settings and records their outcome.
pub struct Janitor {
    settings: Arc<SettingsStore>,
    vault: Arc<dyn Vault>,
    notifier: Arc<dyn Notifier>,
    stats: Mutex<Stats>,
}

impl Janitor {
    pub fn new(
        settings: Arc<SettingsStore>,
        vault: Arc<dyn Vault>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            settings,
            vault,
            notifier,
            stats: Mutex::new(Stats::default()),
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn notifier(&self) -> &dyn Notifier {
        &*self.notifier
    }

    pub async fn stats(&self) -> Stats {
        self.stats.lock().await.clone()
    }

    /// One sweep with the current settings, on the blocking pool.
    pub async fn run(&self) -> Result<Vec<String>> {
        let settings = self.settings.snapshot().await;
        let vault = Arc::clone(&self.vault);
        let notifier = Arc::clone(&self.notifier);
        let now = Utc::now().timestamp_millis();

        let result =
            spawn_blocking(move || sweep(&settings, vault.as_ref(), notifier.as_ref(), now))
                .await
                .map_err(Error::from)
                .and_then(|r| r);

        let mut stats = self.stats.lock().await;
        stats.last_run = Some(Utc::now());
        match &result {
            Ok(deleted) => {
                stats.cleaned_total += deleted.len();
                stats.last_error = None;
            }
            Err(e) => stats.last_error = Some(e.to_string()),
        }

        result
    }

    /// Scheduled entry point: failures are logged and left for the next tick.
    pub async fn tick(&self) {
        debug!("Starting sweep of expired files...");
        match self.run().await {
            Ok(deleted) if !deleted.is_empty() => {
                info!("Cleaned up {} expired file(s)", deleted.len())
            }
            Ok(_) => debug!("Sweep completed, nothing expired"),
            Err(e) => error!("Sweep aborted: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{notice::NoticeBoard, vault::memory::MemoryVault};

    const NOW: i64 = 1_700_000_000_000;

    fn armed() -> Settings {
        Settings {
            target_folder: "tmp".to_string(),
            ttl_minutes: 60,
            check_interval: 10,
            confirmed: true,
        }
    }

    fn scenario_vault() -> MemoryVault {
        let vault = MemoryVault::new();
        vault
            .add_folder("tmp")
            .add_file("tmp/a.md", NOW - 7_200_000)
            .add_file("tmp/b.md", NOW - 1_800_000)
            .add_file("tmp/c.txt", NOW - 7_200_000);
        vault
    }

    #[test]
    fn test_deletes_only_expired_markdown() {
        let vault = scenario_vault();
        let board = NoticeBoard::default();

        let deleted = sweep(&armed(), &vault, &board, NOW).unwrap();

        assert_eq!(deleted, vec!["tmp/a.md"]);
        assert_eq!(vault.trashed(), vec!["tmp/a.md"]);
        assert!(vault.contains("tmp/b.md"));
        assert!(vault.contains("tmp/c.txt"));
        assert_eq!(
            board.last_message().as_deref(),
            Some("Deleted expired files:\ntmp/a.md")
        );
    }

    #[test]
    fn test_disabled_interval_is_noop() {
        let vault = scenario_vault();
        let board = NoticeBoard::default();
        let settings = Settings {
            check_interval: 0,
            ..armed()
        };

        assert!(sweep(&settings, &vault, &board, NOW).unwrap().is_empty());
        assert!(vault.trashed().is_empty());
        assert!(board.recent().is_empty());
    }

    #[test]
    fn test_unconfirmed_warns_without_deleting() {
        let vault = scenario_vault();
        let board = NoticeBoard::default();
        let settings = Settings {
            confirmed: false,
            ..armed()
        };

        assert!(sweep(&settings, &vault, &board, NOW).unwrap().is_empty());
        assert!(vault.trashed().is_empty());
        assert_eq!(board.last_message().as_deref(), Some(UNCONFIRMED_NOTICE));
    }

    #[test]
    fn test_missing_or_file_target_is_ignored() {
        let vault = MemoryVault::new();
        vault.add_file("tmp", NOW - 7_200_000);
        let board = NoticeBoard::default();

        assert!(sweep(&armed(), &vault, &board, NOW).unwrap().is_empty());
        let settings = Settings {
            target_folder: "absent".to_string(),
            ..armed()
        };
        assert!(sweep(&settings, &vault, &board, NOW).unwrap().is_empty());
        assert!(vault.trashed().is_empty());
        assert!(board.recent().is_empty());
    }

    #[test]
    fn test_target_folder_is_normalized() {
        let vault = MemoryVault::new();
        vault
            .add_folder("notes")
            .add_folder("notes/tmp")
            .add_file("notes/tmp/old.md", NOW - 7_200_000);
        let settings = Settings {
            target_folder: "/notes\\tmp/".to_string(),
            ..armed()
        };

        let deleted = sweep(&settings, &vault, &NoticeBoard::default(), NOW).unwrap();
        assert_eq!(deleted, vec!["notes/tmp/old.md"]);
    }

    #[test]
    fn test_subfolders_are_not_scanned() {
        let vault = scenario_vault();
        vault
            .add_folder("tmp/keep")
            .add_file("tmp/keep/old.md", NOW - 10 * 7_200_000);

        let deleted = sweep(&armed(), &vault, &NoticeBoard::default(), NOW).unwrap();
        assert_eq!(deleted, vec!["tmp/a.md"]);
        assert!(vault.contains("tmp/keep"));
        assert!(vault.contains("tmp/keep/old.md"));
    }

    #[test]
    fn test_extension_is_exact() {
        let vault = MemoryVault::new();
        vault
            .add_folder("tmp")
            .add_file("tmp/UPPER.MD", NOW - 7_200_000)
            .add_file("tmp/notes.markdown", NOW - 7_200_000)
            .add_file("tmp/backup.md.bak", NOW - 7_200_000)
            .add_file("tmp/plain", NOW - 7_200_000);

        assert!(
            sweep(&armed(), &vault, &NoticeBoard::default(), NOW)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_ttl_boundary_is_strict() {
        let ttl_millis = armed().ttl_millis();
        let vault = MemoryVault::new();
        vault
            .add_folder("tmp")
            .add_file("tmp/exact.md", NOW - ttl_millis)
            .add_file("tmp/over.md", NOW - ttl_millis - 1);

        let deleted = sweep(&armed(), &vault, &NoticeBoard::default(), NOW).unwrap();
        assert_eq!(deleted, vec!["tmp/over.md"]);
        assert!(!is_expired(NOW - ttl_millis, NOW, ttl_millis));
        assert!(is_expired(NOW - ttl_millis - 1, NOW, ttl_millis));
    }

    #[test]
    fn test_second_sweep_deletes_nothing() {
        let vault = scenario_vault();
        let board = NoticeBoard::default();

        assert_eq!(sweep(&armed(), &vault, &board, NOW).unwrap().len(), 1);
        assert!(sweep(&armed(), &vault, &board, NOW).unwrap().is_empty());
        assert_eq!(vault.trashed(), vec!["tmp/a.md"]);
        // 第二次没有删除任何文件，不再产生通知
        assert_eq!(board.recent().len(), 1);
    }

    #[test]
    fn test_failure_aborts_remaining_candidates() {
        let vault = MemoryVault::new();
        vault
            .add_folder("tmp")
            .add_file("tmp/1.md", NOW - 7_200_000)
            .add_file("tmp/2.md", NOW - 7_200_000)
            .add_file("tmp/3.md", NOW - 7_200_000)
            .fail_on("tmp/2.md");
        let board = NoticeBoard::default();

        assert!(sweep(&armed(), &vault, &board, NOW).is_err());
        assert_eq!(vault.trashed(), vec!["tmp/1.md"]);
        assert!(vault.contains("tmp/3.md"));
        assert!(board.recent().is_empty());
    }

    #[test]
    fn test_root_folder() {
        let vault = MemoryVault::new();
        vault
            .add_file("root.md", NOW - 7_200_000)
            .add_folder("tmp")
            .add_file("tmp/a.md", NOW - 7_200_000);
        let settings = Settings {
            target_folder: "/".to_string(),
            ..armed()
        };

        let deleted = sweep(&settings, &vault, &NoticeBoard::default(), NOW).unwrap();
        assert_eq!(deleted, vec!["root.md"]);
    }

    #[tokio::test]
    async fn test_janitor_tracks_stats() {
        let vault = MemoryVault::new();
        vault.add_folder("tmp").add_file("tmp/old.md", 0);
        let janitor = Janitor::new(
            Arc::new(SettingsStore::in_memory(armed())),
            Arc::new(vault),
            Arc::new(NoticeBoard::default()),
        );

        assert_eq!(janitor.run().await.unwrap(), vec!["tmp/old.md"]);
        janitor.tick().await;

        let stats = janitor.stats().await;
        assert_eq!(stats.cleaned_total, 1);
        assert!(stats.last_run.is_some());
        assert!(stats.last_error.is_none());
    }

    #[tokio::test]
    async fn test_janitor_records_failure() {
        let vault = MemoryVault::new();
        vault
            .add_folder("tmp")
            .add_file("tmp/old.md", 0)
            .fail_on("tmp/old.md");
        let janitor = Janitor::new(
            Arc::new(SettingsStore::in_memory(armed())),
            Arc::new(vault),
            Arc::new(NoticeBoard::default()),
        );

        janitor.tick().await;

        let stats = janitor.stats().await;
        assert_eq!(stats.cleaned_total, 0);
        assert!(stats.last_error.is_some());
    }
}
