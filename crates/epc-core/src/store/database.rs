//! Read-only SQLite handles and the row decoding helpers shared by the
//! typed stores.
//!
//! A handle only remembers its path. Every lookup opens its own read-only
//! connection, so handles can be shared between concurrent requests without
//! a lock.

use std::path::{Path, PathBuf};

use rusqlite::types::{Type, ValueRef};
use rusqlite::{Connection, OpenFlags, Row};

use crate::errors::{EpcError, EpcResult};
use crate::store::schema;

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    if raw == "~" || raw.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            let mut expanded = PathBuf::from(home);
            if raw.len() > 2 {
                expanded.push(&raw[2..]);
            }
            return expanded;
        }
    }
    path.to_path_buf()
}

/// A verified, read-only SQLite file.
#[derive(Clone, Debug)]
pub struct StoreHandle {
    label: String,
    db_path: PathBuf,
}

impl StoreHandle {
    /// Accept `path` as a backend if it exists, opens read-only and carries
    /// every table in `required_tables`.
    pub fn open(label: &str, path: &Path, required_tables: &[&str]) -> EpcResult<Self> {
        let db_path = expand_tilde(path);
        if !db_path.is_file() {
            return Err(EpcError::CatalogueUnavailable(format!(
                "{label}: {} does not exist",
                db_path.display()
            )));
        }
        let handle = Self {
            label: label.to_string(),
            db_path,
        };
        let conn = handle.connect()?;
        schema::verify_tables(&conn, required_tables)
            .map_err(|e| EpcError::CatalogueUnavailable(format!("{label}: {e}")))?;
        Ok(handle)
    }

    /// Open a new read-only connection to the file.
    pub fn connect(&self) -> EpcResult<Connection> {
        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

// ---------------------------------------------------------------------------
// Column decoding
// ---------------------------------------------------------------------------

// The catalogue dumps are not consistent about column affinity: codes that
// look numeric are sometimes stored as integers and key numbers sometimes as
// text. Decode by value rather than by declared type.

/// Read a column as text, or `None` for NULL.
pub fn text_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(v) => Some(v.to_string()),
        ValueRef::Real(v) => Some(v.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    })
}

/// Read a column as text, mapping NULL to the empty string.
pub fn text_or_empty(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(text_column(row, idx)?.unwrap_or_default())
}

/// Read a column as an integer, accepting numeric text.
pub fn int_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<i64> {
    match row.get_ref(idx)? {
        ValueRef::Integer(v) => Ok(v),
        ValueRef::Real(v) => Ok(v as i64),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes)
            .trim()
            .parse::<i64>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        other => Err(rusqlite::Error::InvalidColumnType(
            idx,
            format!("column {idx}"),
            other.data_type(),
        )),
    }
}
