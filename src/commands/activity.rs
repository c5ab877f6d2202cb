use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use nextapp::services::collector;
use nextapp::{ActivityType, LaunchObservation};

use super::AppContext;

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Application identifier, e.g. org.telegram.messenger
    pub app: String,
    /// Launch time in ms since the epoch; defaults to now
    #[arg(long)]
    pub timestamp: Option<i64>,
    #[arg(long, default_value_t = 100)]
    pub battery: u8,
    #[arg(long)]
    pub charging: bool,
    /// Motion state, e.g. STILL or IN_VEHICLE
    #[arg(long)]
    pub activity: Option<ActivityType>,
}

pub fn record(ctx: &AppContext, args: RecordArgs) -> Result<()> {
    let observation = LaunchObservation {
        app: args.app,
        timestamp: args.timestamp.unwrap_or_else(nextapp::utils::now_millis),
        is_charging: args.charging,
        battery_level: args.battery.min(100),
        activity_type: args.activity,
    };

    let store = ctx.open_store()?;
    let written = collector::record_launches(
        &store,
        std::slice::from_ref(&observation),
        &ctx.settings.collection,
        ctx.tz,
    )?;

    if written == 0 {
        println!("Skipped {} (excluded or not newer than the last event)", observation.app);
    } else {
        println!("Recorded {}", observation.app);
    }
    Ok(())
}

/// Imports observations from a file with one JSON object per line.
pub fn import(ctx: &AppContext, path: PathBuf) -> Result<()> {
    let file = std::fs::File::open(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut observations = Vec::new();
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let observation: LaunchObservation = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid launch observation", path.display(), line_no + 1))?;
        observations.push(observation);
    }

    let store = ctx.open_store()?;
    let written =
        collector::record_launches(&store, &observations, &ctx.settings.collection, ctx.tz)?;

    println!(
        "Imported {} of {} observations ({} skipped)",
        written,
        observations.len(),
        observations.len() - written
    );
    Ok(())
}
