pub mod activity;
pub mod predict;
pub mod settings;
pub mod storage;
pub mod watch;

use std::path::PathBuf;

use anyhow::Result;
use chrono_tz::Tz;
use nextapp::utils::config;
use nextapp::{EventStore, Settings};

/// Resolved data directory, settings and timezone shared by every command.
pub struct AppContext {
    pub data_dir: PathBuf,
    pub settings_path: PathBuf,
    pub settings: Settings,
    pub tz: Tz,
}

impl AppContext {
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.unwrap_or_else(config::data_dir);
        let settings_path = config::settings_path(&data_dir);
        let settings = config::load_settings(&settings_path)?;
        let tz = config::parse_timezone(&settings.general.timezone)?;

        Ok(Self {
            data_dir,
            settings_path,
            settings,
            tz,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        config::database_path(&self.data_dir, &self.settings)
    }

    pub fn open_store(&self) -> Result<EventStore> {
        let db_path = self.db_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(EventStore::open(&db_path)?)
    }
}
