//! Deterministic contextual features derived from a timestamp and device state.
//!
//! Everything here is a pure function. The collector applies these at write
//! time and the host applies them again when building an inference context.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::models::{ActivityType, LaunchObservation, NewLaunch, PowerState, PredictionContext};

pub const HOURS: usize = 24;
pub const DAYS_OF_WEEK: usize = 7;
pub const TIME_SLOTS: usize = 4;
pub const BATTERY_BUCKETS: usize = 4;
pub const DAYS_OF_MONTH: usize = 31;

/// Night (0-5) = 0, morning (6-11) = 1, day (12-17) = 2, evening (18-23) = 3.
pub fn time_slot(hour: u32) -> u32 {
    match hour {
        0..=5 => 0,
        6..=11 => 1,
        12..=17 => 2,
        18..=23 => 3,
        _ => 0,
    }
}

/// <=25 = 0, <=50 = 1, <=75 = 2, above = 3.
pub fn battery_bucket(level: u8) -> u32 {
    match level {
        0..=25 => 0,
        26..=50 => 1,
        51..=75 => 2,
        _ => 3,
    }
}

/// Sunday (1) and Saturday (7).
pub fn is_weekend(day_of_week: u32) -> bool {
    day_of_week == 1 || day_of_week == 7
}

/// Calendar fields of one instant in a given timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFeatures {
    pub hour: u32,
    /// 1 = Sunday .. 7 = Saturday.
    pub day_of_week: u32,
    pub time_slot: u32,
    pub day_of_month: u32,
    pub is_weekend: bool,
}

impl CalendarFeatures {
    pub fn at(timestamp_ms: i64, tz: Tz) -> Self {
        let local = local_time(timestamp_ms, tz);
        let hour = local.hour();
        let day_of_week = local.weekday().number_from_sunday();
        Self {
            hour,
            day_of_week,
            time_slot: time_slot(hour),
            day_of_month: local.day(),
            is_weekend: is_weekend(day_of_week),
        }
    }
}

/// Local time of `timestamp_ms`; out-of-range timestamps map to the epoch.
pub fn local_time(timestamp_ms: i64, tz: Tz) -> DateTime<Tz> {
    let utc = Utc.timestamp_millis_opt(timestamp_ms).single().unwrap_or_else(|| {
        log::warn!(
            "[Features] Timestamp {} out of range, using the epoch",
            timestamp_ms
        );
        DateTime::<Utc>::default()
    });
    utc.with_timezone(&tz)
}

pub fn day_of_month(timestamp_ms: i64, tz: Tz) -> u32 {
    local_time(timestamp_ms, tz).day()
}

/// Builds the row the collector writes for one observed launch.
pub fn extract_launch(
    observation: &LaunchObservation,
    previous_app: Option<String>,
    tz: Tz,
) -> NewLaunch {
    let calendar = CalendarFeatures::at(observation.timestamp, tz);
    NewLaunch {
        app: observation.app.clone(),
        app_hash: crate::utils::hash_app(&observation.app),
        timestamp: observation.timestamp,
        hour: calendar.hour,
        day_of_week: calendar.day_of_week,
        time_slot: calendar.time_slot,
        previous_app,
        is_charging: observation.is_charging,
        battery_level: observation.battery_level.min(100),
        activity_type: observation.activity_type,
    }
}

/// Builds the inference context for "now" as seen by the host.
pub fn build_context(
    timestamp_ms: i64,
    tz: Tz,
    power: PowerState,
    previous_app: Option<String>,
    activity_type: Option<ActivityType>,
) -> PredictionContext {
    let calendar = CalendarFeatures::at(timestamp_ms, tz);
    PredictionContext {
        hour: calendar.hour,
        day_of_week: calendar.day_of_week,
        time_slot: calendar.time_slot,
        is_charging: power.is_charging,
        battery_level: power.battery_level.min(100),
        previous_app,
        activity_type,
        is_weekend: calendar.is_weekend,
        day_of_month: calendar.day_of_month,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-03-09 is a Saturday
    const SAT_2024_03_09_2330_UTC: i64 = 1_710_027_000_000;

    #[test]
    fn out_of_range_timestamp_maps_to_epoch() {
        let calendar = CalendarFeatures::at(i64::MAX, chrono_tz::UTC);
        assert_eq!(calendar.hour, 0);
        assert_eq!(calendar.day_of_month, 1);
        // 1970-01-01 was a Thursday
        assert_eq!(calendar.day_of_week, 5);
    }

    #[test]
    fn time_slot_boundaries() {
        assert_eq!(time_slot(0), 0);
        assert_eq!(time_slot(5), 0);
        assert_eq!(time_slot(6), 1);
        assert_eq!(time_slot(11), 1);
        assert_eq!(time_slot(12), 2);
        assert_eq!(time_slot(17), 2);
        assert_eq!(time_slot(18), 3);
        assert_eq!(time_slot(23), 3);
    }

    #[test]
    fn battery_bucket_boundaries() {
        assert_eq!(battery_bucket(0), 0);
        assert_eq!(battery_bucket(25), 0);
        assert_eq!(battery_bucket(26), 1);
        assert_eq!(battery_bucket(50), 1);
        assert_eq!(battery_bucket(75), 2);
        assert_eq!(battery_bucket(76), 3);
        assert_eq!(battery_bucket(100), 3);
    }

    #[test]
    fn weekend_is_sunday_or_saturday() {
        assert!(is_weekend(1));
        assert!(is_weekend(7));
        for day in 2..=6 {
            assert!(!is_weekend(day));
        }
    }

    #[test]
    fn calendar_uses_sunday_first_week() {
        let utc = CalendarFeatures::at(SAT_2024_03_09_2330_UTC, chrono_tz::UTC);
        assert_eq!(utc.hour, 23);
        assert_eq!(utc.day_of_week, 7);
        assert_eq!(utc.time_slot, 3);
        assert_eq!(utc.day_of_month, 9);
        assert!(utc.is_weekend);
    }

    #[test]
    fn calendar_respects_timezone() {
        // 02:30 on Sunday the 10th in Moscow (UTC+3)
        let msk = CalendarFeatures::at(SAT_2024_03_09_2330_UTC, chrono_tz::Europe::Moscow);
        assert_eq!(msk.hour, 2);
        assert_eq!(msk.day_of_week, 1);
        assert_eq!(msk.time_slot, 0);
        assert_eq!(msk.day_of_month, 10);
    }

    #[test]
    fn extract_launch_derives_fields_and_keeps_chain() {
        let obs = LaunchObservation {
            app: "com.example.maps".to_string(),
            timestamp: SAT_2024_03_09_2330_UTC,
            is_charging: true,
            battery_level: 42,
            activity_type: Some(ActivityType::InVehicle),
        };
        let launch = extract_launch(&obs, Some("com.example.music".to_string()), chrono_tz::UTC);
        assert_eq!(launch.previous_app.as_deref(), Some("com.example.music"));
        assert_eq!(launch.hour, 23);
        assert_eq!(launch.time_slot, 3);
        assert_eq!(launch.app_hash, crate::utils::hash_app("com.example.maps"));
    }
}
