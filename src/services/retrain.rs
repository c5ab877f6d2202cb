use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::database::EventStore;
use crate::error::Result;
use crate::services::predictor::PredictorSet;

/// Opens the store at `db_path` and retrains both predictors from it.
pub fn retrain_once(db_path: &Path, predictors: &PredictorSet) -> Result<()> {
    let store = EventStore::open(db_path)?;
    predictors.train_all(&store)
}

/// Retrains both predictors every `interval`, starting immediately.
///
/// A failed cycle is logged and skipped; the next tick tries again. `after`
/// runs on the blocking pool after every successful cycle.
pub fn start_retrain_loop<F>(
    db_path: PathBuf,
    predictors: Arc<PredictorSet>,
    interval: Duration,
    after: F,
) -> JoinHandle<()>
where
    F: Fn(&PredictorSet) + Send + Sync + 'static,
{
    let after = Arc::new(after);

    tokio::spawn(async move {
        log::info!("[Retrain] Service started (runs every {}s)", interval.as_secs());
        let mut ticker = tokio::time::interval(interval);

        loop {
            ticker.tick().await;

            let path = db_path.clone();
            let set = Arc::clone(&predictors);
            let after = Arc::clone(&after);
            let cycle = tokio::task::spawn_blocking(move || {
                retrain_once(&path, &set)?;
                (*after)(&*set);
                Ok::<_, crate::error::PredictError>(())
            })
            .await;

            match cycle {
                Ok(Ok(())) => log::debug!("[Retrain] Cycle completed"),
                Ok(Err(e)) => log::error!("[Retrain] Cycle skipped: {}", e),
                Err(e) => log::error!("[Retrain] Cycle task failed: {}", e),
            }
        }
    })
}
