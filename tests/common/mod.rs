#![allow(dead_code)]

use nextapp::services::collector;
use nextapp::{EventStore, LaunchObservation, MemoryEventStore, Settings};

/// Monday 2024-03-04 09:00:00 UTC.
pub const MONDAY_0900_UTC: i64 = 1_709_542_800_000;

pub fn observation(app: &str, timestamp: i64) -> LaunchObservation {
    LaunchObservation {
        app: app.to_string(),
        timestamp,
        is_charging: false,
        battery_level: 80,
        activity_type: None,
    }
}

/// Observations 30 seconds apart starting Monday 09:00 UTC.
pub fn observations(apps: &[&str]) -> Vec<LaunchObservation> {
    apps.iter()
        .enumerate()
        .map(|(i, app)| observation(app, MONDAY_0900_UTC + i as i64 * 30_000))
        .collect()
}

pub fn alternating(n: usize, a: &'static str, b: &'static str) -> Vec<&'static str> {
    (0..n).map(|i| if i % 2 == 0 { a } else { b }).collect()
}

pub fn sqlite_store(apps: &[&str]) -> EventStore {
    let store = EventStore::open_in_memory().unwrap();
    collector::record_launches(
        &store,
        &observations(apps),
        &Settings::default().collection,
        chrono_tz::UTC,
    )
    .unwrap();
    store
}

pub fn memory_store(apps: &[&str]) -> MemoryEventStore {
    let store = MemoryEventStore::new();
    collector::record_launches(
        &store,
        &observations(apps),
        &Settings::default().collection,
        chrono_tz::UTC,
    )
    .unwrap();
    store
}
