use rusqlite::Connection;

use crate::error::Result;

pub fn create_tables(conn: &Connection) -> Result<()> {
    // Launch events, append-only and ordered by timestamp
    conn.execute(
        "CREATE TABLE IF NOT EXISTS launch_events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            app TEXT NOT NULL,
            app_hash INTEGER NOT NULL,
            timestamp INTEGER NOT NULL,
            hour INTEGER NOT NULL,
            day_of_week INTEGER NOT NULL,
            time_slot INTEGER NOT NULL,
            previous_app TEXT,
            is_charging INTEGER NOT NULL,
            battery_level INTEGER NOT NULL,
            activity_type TEXT DEFAULT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_launch_events_timestamp ON launch_events(timestamp)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_launch_events_app_hash ON launch_events(app_hash)",
        [],
    )?;

    Ok(())
}
