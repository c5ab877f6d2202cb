pub mod config;

use std::hash::Hasher;

/// Stable xxHash64 of an app identifier, stored alongside the id for indexing.
pub fn hash_app(app: &str) -> u64 {
    let mut hasher = twox_hash::XxHash64::default();
    hasher.write(app.as_bytes());
    hasher.finish()
}

/// Current wall-clock time in milliseconds since the epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
