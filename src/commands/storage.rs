use anyhow::Result;
use chrono::{TimeZone, Utc};
use nextapp::utils::now_millis;

use super::AppContext;

const MS_PER_DAY: i64 = 86_400_000;

fn format_timestamp(ctx: &AppContext, ms: Option<i64>) -> String {
    ms.and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map(|dt| dt.with_timezone(&ctx.tz).format("%Y-%m-%d %H:%M:%S %Z").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn stats(ctx: &AppContext) -> Result<()> {
    let store = ctx.open_store()?;
    let stats = store.stats(10)?;

    println!("Events:        {}", stats.total_events);
    println!("Distinct apps: {}", stats.distinct_apps);
    println!("Oldest:        {}", format_timestamp(ctx, stats.oldest_timestamp));
    println!("Newest:        {}", format_timestamp(ctx, stats.newest_timestamp));
    if !stats.top_apps.is_empty() {
        println!("Top apps:");
        for app in &stats.top_apps {
            println!("  {:<40} {}", app.app, app.count);
        }
    }
    Ok(())
}

/// Removes events older than the retention window and returns the count.
pub fn cleanup_old_data(ctx: &AppContext, retention_days: Option<i64>) -> Result<usize> {
    let retention_days = retention_days.unwrap_or(ctx.settings.storage.retention_days);
    if retention_days < 1 {
        anyhow::bail!("retention_days must be at least 1, got {}", retention_days);
    }
    let cutoff = now_millis().saturating_sub(retention_days.saturating_mul(MS_PER_DAY));

    let store = ctx.open_store()?;
    let deleted = store.delete_older_than(cutoff)?;
    log::info!(
        "[Storage] Deleted {} events older than {} days",
        deleted,
        retention_days
    );
    Ok(deleted)
}
