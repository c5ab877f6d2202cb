use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use nextapp::services::retrain;
use nextapp::{EventStore, PredictorSet};

use super::predict::{build_report, print_report, PredictArgs};
use super::AppContext;

/// Retrains on the configured cadence and prints a fresh prediction after
/// every cycle until interrupted.
pub async fn run(ctx: AppContext, args: PredictArgs) -> Result<()> {
    // Creates the database and schema up front
    drop(ctx.open_store()?);

    let db_path = ctx.db_path();
    let interval = Duration::from_secs(ctx.settings.training.retrain_interval_secs);
    let predictors = Arc::new(PredictorSet::from_settings(&ctx.settings)?);

    let report_ctx = Arc::new(ctx);
    let report_path = db_path.clone();
    let handle = retrain::start_retrain_loop(db_path, predictors, interval, move |set| {
        let report = EventStore::open(&report_path)
            .map_err(anyhow::Error::from)
            .and_then(|store| build_report(&report_ctx, &args, set, &store))
            .and_then(|report| print_report(&report, args.json));
        if let Err(e) = report {
            log::error!("[Watch] Prediction failed: {}", e);
        }
    });

    tokio::signal::ctrl_c().await?;
    handle.abort();
    log::info!("[Watch] Stopped");
    Ok(())
}
