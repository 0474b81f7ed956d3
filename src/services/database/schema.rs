use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_settings_table(conn)?;
    run_settings_migrations(conn)?;
    insert_default_settings(conn)?;
    create_meetings_table(conn)?;
    run_meetings_migrations(conn)?;
    Ok(())
}

fn create_settings_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            current_view TEXT NOT NULL DEFAULT 'Week',
            day_start_hour INTEGER NOT NULL DEFAULT 8,
            day_end_hour INTEGER NOT NULL DEFAULT 20,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create settings table")?;

    Ok(())
}

fn run_settings_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "settings",
        "month_cell_limit",
        "INTEGER NOT NULL DEFAULT 3",
    )?;

    Ok(())
}

fn insert_default_settings(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO settings (id, current_view, day_start_hour, day_end_hour)
         VALUES (1, 'Week', 8, 20)",
        [],
    )
    .context("Failed to insert default settings")?;

    Ok(())
}

fn create_meetings_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS meetings (
            id TEXT PRIMARY KEY,
            subject TEXT NOT NULL,
            description TEXT,
            start_datetime TEXT NOT NULL,
            end_datetime TEXT NOT NULL,
            join_link TEXT,
            attendees TEXT,
            lead_id TEXT,
            contact_id TEXT,
            status TEXT NOT NULL DEFAULT 'scheduled',
            outcome TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create meetings table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_meetings_start ON meetings(start_datetime)",
        [],
    )
    .context("Failed to create meetings start index")?;

    Ok(())
}

fn run_meetings_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "meetings",
        "organizer",
        "TEXT",
    )?;

    Ok(())
}
