//! Typed records decoded at the store boundary and the result shapes handed
//! back to callers.

use std::fs::File;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Catalogue records
// ---------------------------------------------------------------------------

/// One row of the parts table (`MDBCDMPF`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartRecord {
    pub part_number: String,
    pub group_code: String,
    pub name_code: Option<String>,
    /// Reference number printed on the group's schematic.
    pub key_number: i64,
    /// Fixed-width, zero padded count as stored (e.g. `"0000000002"`).
    pub quantity: String,
    pub remark: Option<String>,
}

impl PartRecord {
    /// Quantity with leading zeros stripped, or `None` when nothing is left.
    ///
    /// The all-zero value appears in the data for a handful of rows and means
    /// "no quantity to show", not zero.
    pub fn display_quantity(&self) -> Option<&str> {
        let stripped = self.quantity.trim().trim_start_matches('0');
        if stripped.is_empty() {
            None
        } else {
            Some(stripped)
        }
    }

    /// Remark text if one is stored and not blank.
    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref().filter(|r| !r.trim().is_empty())
    }
}

/// One row of the group table (`MDBGNMPF`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupRecord {
    pub code: String,
    pub description_en: String,
    pub description_ru: String,
}

/// One row of the part-name translation table (`MDBPNCPF`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameRecord {
    pub code: String,
    pub name_en: String,
    pub name_ru: String,
}

/// One row of the VIN registry (`VIN_RU`). Several rows may share a VIN.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VinRecord {
    pub vin: String,
    /// Registry fingerprint (the factory VIN); blank when unknown.
    pub fingerprint: Option<String>,
    pub engine: Option<String>,
    pub production_date: Option<String>,
    pub sale_date: Option<String>,
    pub modification: Option<String>,
    pub trim: Option<String>,
    pub paint: Option<String>,
}

impl VinRecord {
    /// The six optional attributes in display order, paired with their labels.
    pub fn labelled_fields(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("Номер двигателя", self.engine.as_deref()),
            ("Дата производства", self.production_date.as_deref()),
            ("Дата продажи", self.sale_date.as_deref()),
            ("Модификация", self.modification.as_deref()),
            ("Код комплектации", self.trim.as_deref()),
            ("Цвет кузова", self.paint.as_deref()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Result shapes
// ---------------------------------------------------------------------------

/// An image opened for reading, ready to be attached to a reply.
#[derive(Debug)]
pub struct MediaHandle {
    path: PathBuf,
    file: File,
}

impl MediaHandle {
    pub fn new(path: PathBuf, file: File) -> Self {
        Self { path, file }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_file(self) -> File {
        self.file
    }
}

/// Output of every resolver-facing operation.
#[derive(Debug, Default)]
pub struct QueryResult {
    pub text: String,
    pub media: Vec<MediaHandle>,
}

impl QueryResult {
    /// The "nothing found" shape. Also used when a catalogue is unavailable.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            media: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.media.is_empty()
    }
}

/// A matched group paired with the images found for it.
#[derive(Debug)]
pub struct ResolvedGroup {
    pub group: GroupRecord,
    pub media: Vec<MediaHandle>,
}
