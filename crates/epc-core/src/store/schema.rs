//! Table layout of the EPC databases.
//!
//! The engine never writes to these files. The DDL documents the columns the
//! decoders rely on and is what fixtures and benchmarks are built from;
//! `verify_tables` is the check run before a file is accepted as a backend.

use rusqlite::{params, Connection};

use crate::errors::{EpcError, EpcResult};

/// Per-catalogue database: parts, groups, part names.
pub const CATALOGUE_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS MDBCDMPF (
        CDPTNO TEXT NOT NULL,
        CDGRNO TEXT NOT NULL,
        CDPNCD TEXT,
        CDKEY1 INTEGER NOT NULL,
        CDCQTY TEXT NOT NULL DEFAULT '0000000000',
        CDREMK TEXT
    );",
    "CREATE TABLE IF NOT EXISTS MDBGNMPF (
        GNGRNO TEXT PRIMARY KEY,
        GNLGEG TEXT NOT NULL DEFAULT '',
        GNLGRU TEXT NOT NULL DEFAULT ''
    );",
    "CREATE TABLE IF NOT EXISTS MDBPNCPF (
        PNPNCD TEXT PRIMARY KEY,
        PNLGEG TEXT NOT NULL DEFAULT '',
        PNLGRU TEXT NOT NULL DEFAULT ''
    );",
    "CREATE INDEX IF NOT EXISTS idx_parts_number ON MDBCDMPF(CDPTNO);",
    "CREATE INDEX IF NOT EXISTS idx_parts_group ON MDBCDMPF(CDGRNO);",
];

/// EPC index database: which catalogues exist.
pub const EPC_STATEMENTS: &[&str] = &["CREATE TABLE IF NOT EXISTS MDBCATPF (
        CMBPNO TEXT PRIMARY KEY,
        CMGRTY TEXT NOT NULL
    );"];

/// VIN registry database.
pub const VIN_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS VIN_RU (
        VINRU TEXT NOT NULL,
        VINKR TEXT,
        ENGINE TEXT,
        PDATE TEXT,
        SDATE TEXT,
        MOD TEXT,
        TRIM TEXT,
        PAINT TEXT
    );",
    "CREATE INDEX IF NOT EXISTS idx_vin_ru ON VIN_RU(VINRU);",
];

pub const CATALOGUE_TABLES: &[&str] = &["MDBCDMPF", "MDBGNMPF", "MDBPNCPF"];
pub const EPC_TABLES: &[&str] = &["MDBCATPF"];
pub const VIN_TABLES: &[&str] = &["VIN_RU"];

/// Run a list of DDL statements against `conn`.
pub fn apply_statements(conn: &Connection, statements: &[&str]) -> EpcResult<()> {
    for stmt in statements {
        conn.execute_batch(stmt)?;
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> EpcResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
        params![table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Fail with `EpcError::Schema` naming every table in `required` that is
/// missing from `conn`.
pub fn verify_tables(conn: &Connection, required: &[&str]) -> EpcResult<()> {
    let mut missing = Vec::new();
    for table in required {
        if !table_exists(conn, table)? {
            missing.push(*table);
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(EpcError::Schema(format!(
            "missing tables: {}",
            missing.join(", ")
        )))
    }
}
