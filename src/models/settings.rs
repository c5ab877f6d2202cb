use serde::{Deserialize, Serialize};

use crate::models::PredictorKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub training: TrainingSettings,
    pub prediction: PredictionSettings,
    pub collection: CollectionSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    pub database_path: String,
    /// IANA timezone used to derive calendar features.
    pub timezone: String,
    pub selected_model: PredictorKind,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            database_path: "nextapp.db".to_string(),
            timezone: "UTC".to_string(),
            selected_model: PredictorKind::Markov,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingSettings {
    /// Most recent events read per training pass.
    pub window: usize,
    pub min_records: usize,
    pub min_transitions: u32,
    pub smoothing_alpha: f64,
    pub retrain_interval_secs: u64,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            window: 5000,
            min_records: 50,
            min_transitions: 5,
            smoothing_alpha: 1.0,
            retrain_interval_secs: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionSettings {
    pub top_k: usize,
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionSettings {
    /// Case-insensitive substrings marking launcher/system packages.
    pub exclude_keywords: Vec<String>,
    pub self_package: Option<String>,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            exclude_keywords: [
                "launcher",
                "systemui",
                "settings",
                "keyboard",
                "inputmethod",
                "android",
                "google.android.packageinstaller",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
            self_package: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub retention_days: i64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self { retention_days: 30 }
    }
}
