//! SQLite persistence for applied imports.
//!
//! Tables:
//! - `animals`: the herd registry, identified by `(series, rg)`.
//! - `inseminations`: one row per animal and insemination date.
//! - `import_batches`: MD5 digests of pastes already applied.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS animals (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    series   TEXT NOT NULL,
    rg       TEXT NOT NULL,
    location TEXT,
    UNIQUE (series, rg)
);
CREATE TABLE IF NOT EXISTS inseminations (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    animal_id     INTEGER NOT NULL REFERENCES animals (id),
    sire          TEXT,
    event_date    TEXT NOT NULL,
    followup_date TEXT,
    result        TEXT,
    UNIQUE (animal_id, event_date)
);
CREATE TABLE IF NOT EXISTS import_batches (
    md5        TEXT PRIMARY KEY,
    records    INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
";

/// An insemination ready to be written, dates already in ISO format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insemination {
    pub animal_id: i64,
    pub sire: Option<String>,
    pub event_date: String,
    pub followup_date: Option<String>,
    pub result: Option<&'static str>,
}

/// Open the database file, creating the schema when missing.
pub fn open(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

/// Look up an animal id. Series comparison ignores ASCII case.
pub fn find_animal(conn: &Connection, series: &str, rg: &str) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM animals WHERE UPPER(series) = UPPER(?1) AND rg = ?2",
        params![series, rg],
        |row| row.get(0),
    )
    .optional()
}

pub fn update_animal_location(conn: &Connection, animal_id: i64, location: &str) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE animals SET location = ?1 WHERE id = ?2",
        params![location, animal_id],
    )?;
    Ok(())
}

/// Insert or refresh the insemination for `(animal_id, event_date)`.
///
/// Empty optional values never overwrite data already stored.
pub fn upsert_insemination(conn: &Connection, ins: &Insemination) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO inseminations (animal_id, sire, event_date, followup_date, result)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (animal_id, event_date) DO UPDATE SET
             sire = COALESCE(excluded.sire, sire),
             followup_date = COALESCE(excluded.followup_date, followup_date),
             result = COALESCE(excluded.result, result)",
        params![
            ins.animal_id,
            ins.sire,
            ins.event_date,
            ins.followup_date,
            ins.result
        ],
    )?;
    Ok(())
}

pub fn batch_applied(conn: &Connection, md5: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT 1 FROM import_batches WHERE md5 = ?1",
        params![md5],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

pub fn record_batch(conn: &Connection, md5: &str, records: usize) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO import_batches (md5, records) VALUES (?1, ?2)",
        params![md5, records as i64],
    )?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn insert_animal(conn: &Connection, series: &str, rg: &str) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO animals (series, rg) VALUES (?1, ?2)",
        params![series, rg],
    )?;
    Ok(conn.last_insert_rowid())
}
