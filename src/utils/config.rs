use std::path::{Path, PathBuf};

use chrono_tz::Tz;

use crate::error::{PredictError, Result};
use crate::models::Settings;

const ENV_DATA_DIR: &str = "NEXTAPP_DATA_DIR";
const ENV_DB_PATH: &str = "NEXTAPP_DB_PATH";
const ENV_TIMEZONE: &str = "NEXTAPP_TIMEZONE";
const ENV_MODEL: &str = "NEXTAPP_MODEL";

pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Data directory from the environment, falling back to `.nextapp`.
pub fn data_dir() -> PathBuf {
    env_value(ENV_DATA_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".nextapp"))
}

pub fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config").join("settings.json")
}

pub fn apply_env_defaults(settings: &mut Settings) -> Result<()> {
    if let Some(path) = env_value(ENV_DB_PATH) {
        settings.general.database_path = path;
    }
    if let Some(tz) = env_value(ENV_TIMEZONE) {
        settings.general.timezone = tz;
    }
    if let Some(model) = env_value(ENV_MODEL) {
        settings.general.selected_model = model.parse()?;
    }
    Ok(())
}

/// Reads settings from `path`, using defaults when the file does not exist.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let mut settings = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str::<Settings>(&content)?
    } else {
        Settings::default()
    };
    apply_env_defaults(&mut settings)?;
    validate(&settings)?;
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>().map_err(|_| PredictError::InvalidValue {
        field: "timezone",
        value: name.to_string(),
    })
}

/// Resolves the configured database path relative to the data directory.
pub fn database_path(data_dir: &Path, settings: &Settings) -> PathBuf {
    let configured = Path::new(&settings.general.database_path);
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        data_dir.join(configured)
    }
}

pub fn validate(settings: &Settings) -> Result<()> {
    parse_timezone(&settings.general.timezone)?;
    let training = &settings.training;
    if training.window == 0 {
        return Err(PredictError::Config("training.window must be positive".into()));
    }
    if !(training.smoothing_alpha > 0.0 && training.smoothing_alpha.is_finite()) {
        return Err(PredictError::Config(format!(
            "training.smoothing_alpha must be a positive number, got {}",
            training.smoothing_alpha
        )));
    }
    if training.retrain_interval_secs == 0 {
        return Err(PredictError::Config(
            "training.retrain_interval_secs must be positive".into(),
        ));
    }
    if settings.storage.retention_days < 1 {
        return Err(PredictError::Config(format!(
            "storage.retention_days must be at least 1, got {}",
            settings.storage.retention_days
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PredictorKind;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings.training.window, 5000);
        assert_eq!(settings.training.min_records, 50);
        assert_eq!(settings.prediction.top_k, 3);
    }

    #[test]
    fn saved_settings_are_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = settings_path(dir.path());
        let mut settings = Settings::default();
        settings.general.selected_model = PredictorKind::NaiveBayes;
        settings.general.timezone = "Europe/Moscow".to_string();
        save_settings(&path, &settings).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded.general.selected_model, PredictorKind::NaiveBayes);
        assert_eq!(loaded.general.timezone, "Europe/Moscow");
    }

    #[test]
    fn partial_file_fills_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"prediction":{"top_k":5}}"#).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded.prediction.top_k, 5);
        assert_eq!(loaded.training.min_transitions, 5);
    }

    #[test]
    fn rejects_bad_timezone_and_alpha() {
        let mut settings = Settings::default();
        settings.general.timezone = "Mars/Olympus".to_string();
        assert!(validate(&settings).is_err());

        let mut settings = Settings::default();
        settings.training.smoothing_alpha = 0.0;
        assert!(validate(&settings).is_err());
    }

    #[test]
    fn rejects_non_positive_retention() {
        let mut settings = Settings::default();
        settings.storage.retention_days = 0;
        assert!(validate(&settings).is_err());

        settings.storage.retention_days = -1;
        assert!(validate(&settings).is_err());

        settings.storage.retention_days = i64::MAX;
        assert!(validate(&settings).is_ok());
    }
}
