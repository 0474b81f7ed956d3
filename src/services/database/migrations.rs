//! Additive schema migrations. Columns are only ever added, never dropped, so an
//! older database opens cleanly with a newer build.

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
            [table, column],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to inspect columns of {}", table))?;

    Ok(count > 0)
}

/// Add `column` with the given SQL definition (e.g. `"TEXT"`) unless present.
pub fn ensure_column(conn: &Connection, table: &str, column: &str, definition: &str) -> Result<()> {
    if column_exists(conn, table, column)? {
        return Ok(());
    }

    log::info!("Migrating schema: adding {}.{}", table, column);
    conn.execute(
        &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, definition),
        [],
    )
    .with_context(|| format!("Failed to add {}.{}", table, column))?;
    Ok(())
}
