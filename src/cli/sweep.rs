use std::sync::Arc;

use crate::{
    errors::Result,
    janitor::Janitor,
    notice::{NoticeBoard, Notifier},
    settings::SettingsStore,
    vault::{FsVault, TrashMode, Vault},
    vars::{MDSWEEP_SETTINGS_FILE, MDSWEEP_TRASH_MODE, MDSWEEP_VAULT_DIR},
};

pub async fn run() -> Result<()> {
    println!("Running sweep...");
    let trash_mode = MDSWEEP_TRASH_MODE.parse::<TrashMode>()?;
    let vault = FsVault::open(*MDSWEEP_VAULT_DIR, trash_mode)?;
    let settings = Arc::new(SettingsStore::load(*MDSWEEP_SETTINGS_FILE)?);
    let snapshot = settings.snapshot().await;
    if !snapshot.is_armed() {
        println!(
            "Sweep is disabled (checkInterval: {}, confirmed: {}), no file will be touched",
            snapshot.check_interval, snapshot.confirmed
        );
    }

    let notices = Arc::new(NoticeBoard::default());
    let janitor = Janitor::new(
        settings,
        Arc::new(vault) as Arc<dyn Vault>,
        Arc::clone(&notices) as Arc<dyn Notifier>,
    );
    let deleted = janitor.run().await?;

    for notice in notices.recent() {
        println!("{}", notice.message);
    }
    println!("Sweep completed. Total files deleted: {}", deleted.len());

    Ok(())
}
