//! Schema migrations, tracked through `PRAGMA user_version`.
//! Every applied step is recorded in the internal `log` table.

use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "create_base_tables",
    sql: r#"
        CREATE TABLE IF NOT EXISTS flights (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            flight_number INTEGER NOT NULL,
            date          TEXT NOT NULL,
            operator      TEXT NOT NULL,
            start_time    TEXT NOT NULL,
            end_time      TEXT,
            status        TEXT NOT NULL DEFAULT 'open' CHECK(status IN ('open','closed')),
            UNIQUE(date, flight_number)
        );

        CREATE INDEX IF NOT EXISTS idx_flights_operator_status ON flights(operator, status);
        CREATE INDEX IF NOT EXISTS idx_flights_date ON flights(date);

        CREATE TABLE IF NOT EXISTS rounds (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            flight_id     INTEGER NOT NULL REFERENCES flights(id),
            area          TEXT NOT NULL CHECK(area IN ('P','K','S3','S5')),
            operator      TEXT NOT NULL,
            start_time    TEXT NOT NULL,
            end_time      TEXT,
            duration_secs INTEGER,
            status        TEXT NOT NULL DEFAULT 'open' CHECK(status IN ('open','closed')),
            anomalous     INTEGER NOT NULL DEFAULT 0,
            auto_closed   INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_rounds_operator_status ON rounds(operator, status);
        CREATE INDEX IF NOT EXISTS idx_rounds_start_time ON rounds(start_time);

        CREATE TABLE IF NOT EXISTS pauses (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            flight_id  INTEGER NOT NULL REFERENCES flights(id),
            round_id   INTEGER REFERENCES rounds(id),
            reason     TEXT NOT NULL CHECK(reason IN ('battery','meal','other')),
            start_time TEXT NOT NULL,
            end_time   TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_pauses_round ON pauses(round_id);

        CREATE TABLE IF NOT EXISTS justifications (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            flight_id INTEGER NOT NULL REFERENCES flights(id),
            area      TEXT NOT NULL CHECK(area IN ('P','K','S3','S5')),
            operator  TEXT NOT NULL,
            date      TEXT NOT NULL,
            reason    TEXT NOT NULL
        );
    "#,
}];

/// Ensure that the `log` table exists before anything is recorded in it.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn schema_version(conn: &Connection) -> AppResult<i64> {
    let v: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(v)
}

/// Apply all migrations newer than the stored schema version.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    let current = schema_version(conn)?;

    for m in MIGRATIONS.iter().filter(|m| m.version > current) {
        conn.execute_batch(m.sql)
            .map_err(|e| AppError::Migration(format!("{} failed: {}", m.name, e)))?;

        // user_version does not accept bound parameters
        conn.execute_batch(&format!("PRAGMA user_version = {}", m.version))
            .map_err(|e| AppError::Migration(format!("{} version bump failed: {}", m.name, e)))?;

        ttlog(
            conn,
            "migration_applied",
            m.name,
            &format!("schema migrated to version {}", m.version),
        )?;
    }

    Ok(())
}

/// Number of migrations not yet applied (for `db --info`).
pub fn pending_count(conn: &Connection) -> AppResult<usize> {
    let current = schema_version(conn)?;
    Ok(MIGRATIONS.iter().filter(|m| m.version > current).count())
}
