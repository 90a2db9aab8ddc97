//! Typed lookups against one catalogue database.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, Row};
use tracing::warn;

use crate::errors::EpcResult;
use crate::models::{GroupRecord, NameRecord, PartRecord};
use crate::store::database::{int_column, text_column, text_or_empty, StoreHandle};

const PART_COLUMNS: &str = "CDPTNO, CDGRNO, CDPNCD, CDKEY1, CDCQTY, CDREMK";
const GROUP_COLUMNS: &str = "GNGRNO, GNLGEG, GNLGRU";

/// A registered catalogue: its database and where its group images live.
#[derive(Clone, Debug)]
pub struct Catalogue {
    code: String,
    store: StoreHandle,
    media_root: PathBuf,
    media_extension: String,
}

impl Catalogue {
    pub fn new(code: &str, store: StoreHandle, media_root: PathBuf, media_extension: &str) -> Self {
        Self {
            code: code.to_string(),
            store,
            media_root,
            media_extension: media_extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn connect(&self) -> EpcResult<Connection> {
        self.store.connect()
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    pub fn media_extension(&self) -> &str {
        &self.media_extension
    }
}

// ---------------------------------------------------------------------------
// Row decoding
// ---------------------------------------------------------------------------

fn part_from_row(row: &Row<'_>) -> rusqlite::Result<PartRecord> {
    Ok(PartRecord {
        part_number: text_or_empty(row, 0)?,
        group_code: text_or_empty(row, 1)?,
        name_code: text_column(row, 2)?.filter(|c| !c.is_empty()),
        key_number: int_column(row, 3)?,
        quantity: text_or_empty(row, 4)?,
        remark: text_column(row, 5)?,
    })
}

fn group_from_row(row: &Row<'_>) -> rusqlite::Result<GroupRecord> {
    Ok(GroupRecord {
        code: text_or_empty(row, 0)?,
        description_en: text_or_empty(row, 1)?,
        description_ru: text_or_empty(row, 2)?,
    })
}

fn name_from_row(row: &Row<'_>) -> rusqlite::Result<NameRecord> {
    Ok(NameRecord {
        code: text_or_empty(row, 0)?,
        name_en: text_or_empty(row, 1)?,
        name_ru: text_or_empty(row, 2)?,
    })
}

/// Keep decodable rows, logging the ones that are not.
fn collect_rows<T>(
    table: &str,
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> Vec<T> {
    rows.filter_map(|r| match r {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Skipping undecodable {table} row: {e}");
            None
        }
    })
    .collect()
}

fn optional<T>(result: rusqlite::Result<T>) -> EpcResult<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Escape `LIKE` wildcards so user text is matched literally.
pub fn like_contains(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

// ---------------------------------------------------------------------------
// Point lookups
// ---------------------------------------------------------------------------

pub fn find_part(conn: &Connection, part_number: &str) -> EpcResult<Option<PartRecord>> {
    optional(conn.query_row(
        &format!("SELECT {PART_COLUMNS} FROM MDBCDMPF WHERE CDPTNO = ?1 LIMIT 1;"),
        params![part_number],
        part_from_row,
    ))
}

pub fn find_group(conn: &Connection, group_code: &str) -> EpcResult<Option<GroupRecord>> {
    optional(conn.query_row(
        &format!("SELECT {GROUP_COLUMNS} FROM MDBGNMPF WHERE GNGRNO = ?1 LIMIT 1;"),
        params![group_code],
        group_from_row,
    ))
}

pub fn find_name(conn: &Connection, name_code: &str) -> EpcResult<Option<NameRecord>> {
    optional(conn.query_row(
        "SELECT PNPNCD, PNLGEG, PNLGRU FROM MDBPNCPF WHERE PNPNCD = ?1 LIMIT 1;",
        params![name_code],
        name_from_row,
    ))
}

// ---------------------------------------------------------------------------
// Range lookups
// ---------------------------------------------------------------------------

/// Every part row of a group, in storage order. Rows sharing a key number
/// are all returned.
pub fn parts_in_group(conn: &Connection, group_code: &str) -> EpcResult<Vec<PartRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PART_COLUMNS} FROM MDBCDMPF WHERE CDGRNO = ?1 ORDER BY rowid;"
    ))?;
    let rows = stmt.query_map(params![group_code], part_from_row)?;
    Ok(collect_rows("MDBCDMPF", rows))
}

/// Groups whose code equals `code` exactly.
pub fn groups_by_code(conn: &Connection, code: &str) -> EpcResult<Vec<GroupRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {GROUP_COLUMNS} FROM MDBGNMPF WHERE GNGRNO = ?1 ORDER BY GNGRNO;"
    ))?;
    let rows = stmt.query_map(params![code], group_from_row)?;
    Ok(collect_rows("MDBGNMPF", rows))
}

/// Groups whose English description contains `english` or whose Russian
/// description contains `russian`.
///
/// SQLite's `LIKE` folds ASCII case only, so the English column matches
/// regardless of case while the Russian column needs the caller to pass the
/// casing the column is stored in.
pub fn groups_by_description(
    conn: &Connection,
    english: &str,
    russian: &str,
) -> EpcResult<Vec<GroupRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {GROUP_COLUMNS} FROM MDBGNMPF \
         WHERE GNLGEG LIKE ?1 ESCAPE '\\' OR GNLGRU LIKE ?2 ESCAPE '\\' \
         ORDER BY GNGRNO;"
    ))?;
    let rows = stmt.query_map(
        params![like_contains(english), like_contains(russian)],
        group_from_row,
    )?;
    Ok(collect_rows("MDBGNMPF", rows))
}
