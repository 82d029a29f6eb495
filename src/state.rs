use log::info;
use std::sync::Arc;

use crate::{
    errors::Result,
    janitor::Janitor,
    models::params::SettingsPatch,
    notice::{NoticeBoard, Notifier},
    scheduler::CleanupScheduler,
    settings::{Settings, SettingsStore},
    vault::{TrashMode, Vault},
};

/// Handles shared by the scheduler and the settings API.
pub struct AppState {
    pub settings: Arc<SettingsStore>,
    pub notices: Arc<NoticeBoard>,
    pub janitor: Arc<Janitor>,
    pub scheduler: CleanupScheduler,
    pub vault_root: String,
    pub trash_mode: TrashMode,
}

impl AppState {
    pub async fn new(
        settings: Arc<SettingsStore>,
        vault: Arc<dyn Vault>,
        vault_root: String,
        trash_mode: TrashMode,
    ) -> Result<Self> {
        let notices = Arc::new(NoticeBoard::default());
        let janitor = Arc::new(Janitor::new(
            Arc::clone(&settings),
            vault,
            Arc::clone(&notices) as Arc<dyn Notifier>,
        ));
        let scheduler = CleanupScheduler::new(Arc::clone(&janitor)).await?;

        Ok(Self {
            settings,
            notices,
            janitor,
            scheduler,
            vault_root,
            trash_mode,
        })
    }

    /// Persists a settings change; a changed interval restarts the scheduler.
    pub async fn change(&self, patch: SettingsPatch) -> Result<Settings> {
        let (previous, next) = self.settings.update(|s| patch.apply(s)).await?;
        self.after_change(&previous, &next).await?;

        Ok(next)
    }

    pub async fn reset(&self) -> Result<Settings> {
        let (previous, next) = self
            .settings
            .update(|s| *s = Settings::default())
            .await?;
        info!("Settings reset to defaults");
        self.after_change(&previous, &next).await?;

        Ok(next)
    }

    async fn after_change(&self, previous: &Settings, next: &Settings) -> Result<()> {
        if previous.check_interval != next.check_interval {
            info!(
                "Check interval changed from {} to {} minute(s), restarting",
                previous.check_interval, next.check_interval
            );
            self.scheduler.restart().await?;
        }

        Ok(())
    }
}
