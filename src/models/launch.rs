use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PredictError;

/// Motion state reported by the activity-recognition sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Still,
    Walking,
    Running,
    OnBicycle,
    InVehicle,
    OnFoot,
    Tilting,
    Unknown,
}

impl ActivityType {
    pub const ALL: [ActivityType; 8] = [
        ActivityType::Still,
        ActivityType::Walking,
        ActivityType::Running,
        ActivityType::OnBicycle,
        ActivityType::InVehicle,
        ActivityType::OnFoot,
        ActivityType::Tilting,
        ActivityType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Still => "STILL",
            ActivityType::Walking => "WALKING",
            ActivityType::Running => "RUNNING",
            ActivityType::OnBicycle => "ON_BICYCLE",
            ActivityType::InVehicle => "IN_VEHICLE",
            ActivityType::OnFoot => "ON_FOOT",
            ActivityType::Tilting => "TILTING",
            ActivityType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        ActivityType::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| PredictError::InvalidValue {
                field: "activity_type",
                value: s.to_string(),
            })
    }
}

/// One committed launch event as read back from the event store.
///
/// Calendar fields are derived at write time by the collector; the
/// predictors consume them as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchEvent {
    pub id: i64,
    pub app: String,
    pub app_hash: u64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub hour: u32,
    /// 1 = Sunday .. 7 = Saturday.
    pub day_of_week: u32,
    pub time_slot: u32,
    pub previous_app: Option<String>,
    pub is_charging: bool,
    pub battery_level: u8,
    pub activity_type: Option<ActivityType>,
}

/// A launch event that has not been assigned a row id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLaunch {
    pub app: String,
    pub app_hash: u64,
    pub timestamp: i64,
    pub hour: u32,
    pub day_of_week: u32,
    pub time_slot: u32,
    pub previous_app: Option<String>,
    pub is_charging: bool,
    pub battery_level: u8,
    pub activity_type: Option<ActivityType>,
}

impl NewLaunch {
    pub fn into_event(self, id: i64) -> LaunchEvent {
        LaunchEvent {
            id,
            app: self.app,
            app_hash: self.app_hash,
            timestamp: self.timestamp,
            hour: self.hour,
            day_of_week: self.day_of_week,
            time_slot: self.time_slot,
            previous_app: self.previous_app,
            is_charging: self.is_charging,
            battery_level: self.battery_level,
            activity_type: self.activity_type,
        }
    }
}

/// Device power state at the moment of a launch or a prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerState {
    pub is_charging: bool,
    pub battery_level: u8,
}

impl Default for PowerState {
    fn default() -> Self {
        Self {
            is_charging: false,
            battery_level: 100,
        }
    }
}

/// A raw launch observation handed over by the platform collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchObservation {
    pub app: String,
    pub timestamp: i64,
    #[serde(default)]
    pub is_charging: bool,
    #[serde(default = "default_battery_level")]
    pub battery_level: u8,
    #[serde(default)]
    pub activity_type: Option<ActivityType>,
}

fn default_battery_level() -> u8 {
    100
}
