use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::{
    ops::RangeInclusive,
    path::{Path, PathBuf},
};
use tokio::sync::RwLock;

use crate::errors::{Error, Result};

pub const TTL_MINUTES_RANGE: RangeInclusive<u32> = 1..=10080;
pub const CHECK_INTERVAL_RANGE: RangeInclusive<u32> = 0..=1440;

const MILLIS_PER_MINUTE: i64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Vault-relative folder whose direct children are swept.
    pub target_folder: String,
    pub ttl_minutes: u32,
    /// Minutes between sweeps, 0 disables the scheduler.
    pub check_interval: u32,
    /// Explicit consent to delete files automatically.
    pub confirmed: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_folder: String::from("tmp"),
            ttl_minutes: 1440,
            check_interval: 0,
            confirmed: false,
        }
    }
}

impl Settings {
    pub fn ttl_millis(&self) -> i64 {
        i64::from(self.ttl_minutes) * MILLIS_PER_MINUTE
    }

    // 仅当已确认且间隔大于 0 时才允许删除
    pub fn is_armed(&self) -> bool {
        self.confirmed && self.check_interval > 0
    }

    pub fn validate(&self) -> Result<()> {
        if !TTL_MINUTES_RANGE.contains(&self.ttl_minutes) {
            return Err(Error::TtlOutOfRange {
                min: *TTL_MINUTES_RANGE.start(),
                max: *TTL_MINUTES_RANGE.end(),
                provided: self.ttl_minutes,
            });
        }
        if !CHECK_INTERVAL_RANGE.contains(&self.check_interval) {
            return Err(Error::IntervalOutOfRange {
                min: *CHECK_INTERVAL_RANGE.start(),
                max: *CHECK_INTERVAL_RANGE.end(),
                provided: self.check_interval,
            });
        }

        Ok(())
    }
}

/// Shared, persisted settings.
///
/// Every mutation goes through [`SettingsStore::update`], which writes the
/// new value to disk before it becomes visible to readers.
#[derive(Debug)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    current: RwLock<Settings>,
}

impl SettingsStore {
    /// Loads the settings file, merging its keys over the defaults.
    /// A missing file yields the defaults, and so does every key whose value
    /// has the wrong type or is out of bounds.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = read_settings(&path)?;

        Ok(Self {
            path: Some(path),
            current: RwLock::new(settings),
        })
    }

    /// A store that is never written to disk.
    #[cfg(test)]
    pub fn in_memory(settings: Settings) -> Self {
        Self {
            path: None,
            current: RwLock::new(settings),
        }
    }

    pub async fn snapshot(&self) -> Settings {
        self.current.read().await.clone()
    }

    /// Applies `change`, validates and persists the result.
    ///
    /// Returns the previous and the new settings. Nothing is changed when
    /// validation or persistence fails.
    pub async fn update<F>(&self, change: F) -> Result<(Settings, Settings)>
    where
        F: FnOnce(&mut Settings),
    {
        let mut guard = self.current.write().await;
        let previous = guard.clone();
        let mut next = previous.clone();
        change(&mut next);
        next.validate()?;

        if let Some(path) = &self.path {
            write_settings(path, &next)?;
            debug!("Settings saved to {}", path.display());
        }
        *guard = next.clone();

        Ok((previous, next))
    }
}

fn read_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        info!(
            "Settings file {} not found, using defaults",
            path.display()
        );
        return Ok(Settings::default());
    }
    let file = std::fs::File::open(path)?;
    let value: serde_json::Value = serde_json::from_reader(file)?;

    Ok(merge_over_defaults(value))
}

fn merge_over_defaults(value: serde_json::Value) -> Settings {
    let mut settings = Settings::default();
    let serde_json::Value::Object(map) = value else {
        warn!("Settings file is not a JSON object, using defaults");
        return settings;
    };

    for (key, value) in map {
        let accepted = match key.as_str() {
            "targetFolder" => value
                .as_str()
                .map(|folder| settings.target_folder = folder.to_string())
                .is_some(),
            "ttlMinutes" => bounded(&value, &TTL_MINUTES_RANGE)
                .map(|ttl| settings.ttl_minutes = ttl)
                .is_some(),
            "checkInterval" => bounded(&value, &CHECK_INTERVAL_RANGE)
                .map(|interval| settings.check_interval = interval)
                .is_some(),
            "confirmed" => value
                .as_bool()
                .map(|confirmed| settings.confirmed = confirmed)
                .is_some(),
            _ => {
                debug!("Ignoring unknown settings key: {key}");
                true
            }
        };
        if !accepted {
            warn!("Invalid value {value} for settings key {key}, using the default");
        }
    }

    settings
}

fn bounded(value: &serde_json::Value, range: &RangeInclusive<u32>) -> Option<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| range.contains(n))
}

fn write_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, settings)?;

    Ok(())
}
