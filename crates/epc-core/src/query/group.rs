//! Per-group part listing, one line per schematic key number.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::errors::EpcResult;
use crate::models::{NameRecord, PartRecord};
use crate::query::markdown::escape_markdown;
use crate::store::catalogue::{find_name, parts_in_group, Catalogue};

/// Command a listed part links to.
pub const PART_CALLBACK: &str = "/p";
/// Shown instead of a part link when several parts share a key number.
pub const MULTIPLE_VARIANTS_MARKER: &str = "_найдено несколько вариантов_";

enum Variant {
    Single {
        part_number: String,
        quantity: Option<String>,
    },
    Multiple,
}

struct ListingEntry {
    name: Option<NameRecord>,
    variant: Variant,
}

impl ListingEntry {
    fn render(&self, key_number: i64) -> String {
        let mut line = format!("*{key_number}*\\.");
        if let Some(name) = &self.name {
            line.push_str(&format!(
                " {} \\({}\\)",
                escape_markdown(&name.name_en),
                escape_markdown(&name.name_ru)
            ));
        }
        match &self.variant {
            Variant::Single {
                part_number,
                quantity,
            } => {
                line.push_str(&format!(" {PART_CALLBACK} {part_number}"));
                if let Some(quantity) = quantity {
                    line.push_str(&format!(" \\({quantity} шт\\.\\)"));
                }
            }
            Variant::Multiple => {
                line.push(' ');
                line.push_str(MULTIPLE_VARIANTS_MARKER);
            }
        }
        line
    }
}

/// Quantity annotation for a listing line: absent for one piece and for the
/// all-zero value.
fn listing_quantity(part: &PartRecord) -> Option<String> {
    part.display_quantity()
        .filter(|q| *q != "1")
        .map(str::to_string)
}

/// Render the listing for an already fetched set of parts.
///
/// The first row seen for a key number produces a part link; any further row
/// with the same key number replaces it with the multiple-variants marker.
pub fn render_listing(
    parts: &[PartRecord],
    mut lookup_name: impl FnMut(&str) -> Option<NameRecord>,
) -> String {
    let mut entries: BTreeMap<i64, ListingEntry> = BTreeMap::new();
    for part in parts {
        match entries.entry(part.key_number) {
            Entry::Occupied(mut seen) => seen.get_mut().variant = Variant::Multiple,
            Entry::Vacant(slot) => {
                let name = part.name_code.as_deref().and_then(&mut lookup_name);
                slot.insert(ListingEntry {
                    name,
                    variant: Variant::Single {
                        part_number: part.part_number.clone(),
                        quantity: listing_quantity(part),
                    },
                });
            }
        }
    }

    entries
        .iter()
        .map(|(key, entry)| entry.render(*key))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn list_group_impl(conn: &Connection, group_code: &str) -> EpcResult<String> {
    let parts = parts_in_group(conn, group_code)?;
    debug!("Group {group_code}: {} part rows", parts.len());

    let mut names: HashMap<String, Option<NameRecord>> = HashMap::new();
    let listing = render_listing(&parts, |code| {
        names
            .entry(code.to_string())
            .or_insert_with(|| match find_name(conn, code) {
                Ok(name) => name,
                Err(e) => {
                    warn!("Name lookup failed for {code}: {e}");
                    None
                }
            })
            .clone()
    });
    Ok(listing)
}

/// Listing text for a group; empty when the group has no parts or the
/// catalogue cannot be read.
pub fn list_group(catalogue: &Catalogue, group_code: &str) -> String {
    let result = catalogue
        .connect()
        .and_then(|conn| list_group_impl(&conn, group_code));
    match result {
        Ok(text) => text,
        Err(e) => {
            warn!("Group listing for {group_code} in {} failed: {e}", catalogue.code());
            String::new()
        }
    }
}
