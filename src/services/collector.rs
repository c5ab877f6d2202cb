use chrono_tz::Tz;

use crate::database::{EventSink, EventSource};
use crate::error::Result;
use crate::models::{CollectionSettings, LaunchObservation};
use crate::services::features;

/// True for launcher/system packages and for the host's own package.
pub fn is_excluded(app: &str, settings: &CollectionSettings) -> bool {
    if settings.self_package.as_deref() == Some(app) {
        return true;
    }
    let lower = app.to_lowercase();
    settings
        .exclude_keywords
        .iter()
        .any(|keyword| lower.contains(&keyword.to_lowercase()))
}

/// Appends new launches to the log and returns how many were written.
///
/// Observations at or before the last stored timestamp are skipped so a
/// re-delivered batch does not duplicate rows. `previous_app` is chained from
/// the last stored event through each inserted one, in timestamp order.
pub fn record_launches<S>(
    store: &S,
    observations: &[LaunchObservation],
    settings: &CollectionSettings,
    tz: Tz,
) -> Result<usize>
where
    S: EventSource + EventSink + ?Sized,
{
    let last = store.get_last()?;
    let last_timestamp = last.as_ref().map(|e| e.timestamp).unwrap_or(i64::MIN);
    let mut previous_app = last.map(|e| e.app);

    let mut fresh: Vec<&LaunchObservation> = observations
        .iter()
        .filter(|obs| !is_excluded(&obs.app, settings))
        .filter(|obs| obs.timestamp > last_timestamp)
        .collect();
    fresh.sort_by_key(|obs| obs.timestamp);

    let mut written = 0;
    for obs in fresh {
        let launch = features::extract_launch(obs, previous_app.take(), tz);
        store.append(&launch)?;
        previous_app = Some(launch.app);
        written += 1;
    }

    if written > 0 {
        log::info!("[Collector] Recorded {} launch events", written);
    }
    Ok(written)
}
