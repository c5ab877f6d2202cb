use rusqlite::{Connection, OptionalExtension, Row};

use crate::error::Result;
use crate::models::{AppCount, LaunchEvent, NewLaunch, StoreStats};

const LAUNCH_COLUMNS: &str = "id, app, app_hash, timestamp, hour, day_of_week, time_slot,
     previous_app, is_charging, battery_level, activity_type";

fn map_launch(row: &Row<'_>) -> rusqlite::Result<LaunchEvent> {
    Ok(LaunchEvent {
        id: row.get(0)?,
        app: row.get(1)?,
        app_hash: row.get::<_, i64>(2)? as u64,
        timestamp: row.get(3)?,
        hour: row.get(4)?,
        day_of_week: row.get(5)?,
        time_slot: row.get(6)?,
        previous_app: row.get(7)?,
        is_charging: row.get(8)?,
        battery_level: row.get::<_, i64>(9)?.clamp(0, 100) as u8,
        // Unknown labels are dropped rather than failing the whole read
        activity_type: row
            .get::<_, Option<String>>(10)?
            .and_then(|s| s.parse().ok()),
    })
}

pub fn insert_launch(conn: &Connection, launch: &NewLaunch) -> Result<i64> {
    conn.execute(
        "INSERT INTO launch_events
         (app, app_hash, timestamp, hour, day_of_week, time_slot,
          previous_app, is_charging, battery_level, activity_type)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        rusqlite::params![
            &launch.app,
            launch.app_hash as i64,
            launch.timestamp,
            launch.hour,
            launch.day_of_week,
            launch.time_slot,
            &launch.previous_app,
            launch.is_charging,
            launch.battery_level,
            launch.activity_type.map(|a| a.as_str()),
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Most recent events first, at most `limit` rows.
pub fn get_most_recent(conn: &Connection, limit: usize) -> Result<Vec<LaunchEvent>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM launch_events ORDER BY timestamp DESC, id DESC LIMIT ?1",
        LAUNCH_COLUMNS
    ))?;

    let events = stmt
        .query_map([limit as i64], map_launch)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(events)
}

pub fn get_last(conn: &Connection) -> Result<Option<LaunchEvent>> {
    let event = conn
        .query_row(
            &format!(
                "SELECT {} FROM launch_events ORDER BY timestamp DESC, id DESC LIMIT 1",
                LAUNCH_COLUMNS
            ),
            [],
            map_launch,
        )
        .optional()?;

    Ok(event)
}

/// Every event, oldest first.
pub fn get_all_ascending(conn: &Connection) -> Result<Vec<LaunchEvent>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM launch_events ORDER BY timestamp ASC, id ASC",
        LAUNCH_COLUMNS
    ))?;

    let events = stmt
        .query_map([], map_launch)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(events)
}

pub fn count(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM launch_events", [], |row| row.get(0))?;
    Ok(count)
}

/// Deletes events older than `cutoff_ms` and returns how many were removed.
pub fn delete_older_than(conn: &Connection, cutoff_ms: i64) -> Result<usize> {
    let deleted = conn.execute("DELETE FROM launch_events WHERE timestamp < ?1", [cutoff_ms])?;
    Ok(deleted)
}

pub fn delete_all(conn: &Connection) -> Result<usize> {
    let deleted = conn.execute("DELETE FROM launch_events", [])?;
    Ok(deleted)
}

pub fn get_store_stats(conn: &Connection, top_n: usize) -> Result<StoreStats> {
    let (total_events, distinct_apps, oldest_timestamp, newest_timestamp): (
        i64,
        i64,
        Option<i64>,
        Option<i64>,
    ) = conn.query_row(
        "SELECT COUNT(*), COUNT(DISTINCT app), MIN(timestamp), MAX(timestamp)
         FROM launch_events",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    )?;

    let mut stmt = conn.prepare(
        "SELECT app, COUNT(*) as launches
         FROM launch_events
         GROUP BY app
         ORDER BY launches DESC, app ASC
         LIMIT ?1",
    )?;

    let top_apps = stmt
        .query_map([top_n as i64], |row| {
            Ok(AppCount {
                app: row.get(0)?,
                count: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(StoreStats {
        total_events,
        distinct_apps,
        oldest_timestamp,
        newest_timestamp,
        top_apps,
    })
}
