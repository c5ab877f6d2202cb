use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PredictError;
use crate::models::ActivityType;

/// One ranked candidate returned by a predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub app: String,
    pub probability: f64,
}

impl Prediction {
    pub fn new(app: impl Into<String>, probability: f64) -> Self {
        Self {
            app: app.into(),
            probability,
        }
    }
}

/// Current device context for an inference request.
///
/// Values are trusted: the host derives them with the feature extractor and
/// they are not re-validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionContext {
    pub hour: u32,
    pub day_of_week: u32,
    pub time_slot: u32,
    pub is_charging: bool,
    pub battery_level: u8,
    pub previous_app: Option<String>,
    pub activity_type: Option<ActivityType>,
    pub is_weekend: bool,
    pub day_of_month: u32,
}

/// Which predictor the host has selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorKind {
    #[default]
    Markov,
    NaiveBayes,
}

impl PredictorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictorKind::Markov => "markov",
            PredictorKind::NaiveBayes => "naive_bayes",
        }
    }

    /// The other predictor; used by the host's model toggle.
    pub fn toggled(self) -> Self {
        match self {
            PredictorKind::Markov => PredictorKind::NaiveBayes,
            PredictorKind::NaiveBayes => PredictorKind::Markov,
        }
    }
}

impl fmt::Display for PredictorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PredictorKind {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "markov" => Ok(PredictorKind::Markov),
            "naive_bayes" | "bayes" | "nb" => Ok(PredictorKind::NaiveBayes),
            _ => Err(PredictError::InvalidValue {
                field: "model",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppCount {
    pub app: String,
    pub count: i64,
}

/// Summary of the event store contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_events: i64,
    pub distinct_apps: i64,
    pub oldest_timestamp: Option<i64>,
    pub newest_timestamp: Option<i64>,
    pub top_apps: Vec<AppCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predictor_kind_round_trips_through_str() {
        for kind in [PredictorKind::Markov, PredictorKind::NaiveBayes] {
            assert_eq!(kind.as_str().parse::<PredictorKind>().unwrap(), kind);
        }
        assert_eq!("naive-bayes".parse::<PredictorKind>().unwrap(), PredictorKind::NaiveBayes);
        assert!("lstm".parse::<PredictorKind>().is_err());
    }

    #[test]
    fn toggle_alternates() {
        assert_eq!(PredictorKind::Markov.toggled(), PredictorKind::NaiveBayes);
        assert_eq!(PredictorKind::Markov.toggled().toggled(), PredictorKind::Markov);
    }
}
