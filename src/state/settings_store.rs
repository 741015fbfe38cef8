//! Persistent store for the notification settings record

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};
use anyhow::Context;
use tracing::{debug, info, warn};

use super::NotificationSettings;

/// Fixed key the settings record is stored under
pub const STORAGE_KEY: &str = "countdown-bell.notification-settings";

/// File name of the persisted record inside the data directory
pub fn record_file_name() -> String {
    format!("{}.json", STORAGE_KEY)
}

/// Holds the settings loaded at startup and writes every change back
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    current: Mutex<NotificationSettings>,
}

impl SettingsStore {
    /// Open the store at `path`, loading whatever is persisted there
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = Self::load(&path);
        info!(
            "Loaded notification settings from {} (service={})",
            path.display(),
            current.service.as_str()
        );
        Self {
            path,
            current: Mutex::new(current),
        }
    }

    /// Read the persisted record. Missing or malformed data yields the
    /// default settings.
    pub fn load(path: &Path) -> NotificationSettings {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) => {
                debug!("No settings record at {}: {}", path.display(), e);
                return NotificationSettings::default();
            }
        };

        match serde_json::from_str(&data) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring malformed settings record {}: {}", path.display(), e);
                NotificationSettings::default()
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the current settings
    pub fn current(&self) -> NotificationSettings {
        match self.current.lock() {
            Ok(settings) => settings.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Persist the whole record, replacing any prior value
    pub fn save(&self, settings: &NotificationSettings) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(settings)
            .context("Failed to serialize notification settings")?;
        fs::write(&self.path, data)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        let mut current = self
            .current
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to lock settings: {}", e))?;
        *current = settings.clone();
        debug!("Saved notification settings (service={})", settings.service.as_str());
        Ok(())
    }

    /// Apply a mutation and persist the result
    pub fn update<F>(&self, updater: F) -> anyhow::Result<NotificationSettings>
    where
        F: FnOnce(&mut NotificationSettings),
    {
        let mut settings = self.current();
        updater(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }
}
