use serde::Deserialize;

use crate::settings::Settings;

/// Partial settings update, absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
    pub target_folder: Option<String>,
    pub ttl_minutes: Option<u32>,
    pub check_interval: Option<u32>,
    pub confirmed: Option<bool>,
}

impl SettingsPatch {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(target_folder) = &self.target_folder {
            settings.target_folder = target_folder.clone();
        }
        if let Some(ttl_minutes) = self.ttl_minutes {
            settings.ttl_minutes = ttl_minutes;
        }
        if let Some(check_interval) = self.check_interval {
            settings.check_interval = check_interval;
        }
        if let Some(confirmed) = self.confirmed {
            settings.confirmed = confirmed;
        }
    }
}
