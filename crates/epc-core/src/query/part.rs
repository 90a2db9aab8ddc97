//! Part number lookup.

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::errors::EpcResult;
use crate::models::QueryResult;
use crate::query::format::format_part;
use crate::query::media::resolve_media;
use crate::store::catalogue::{find_group, find_name, find_part, Catalogue};
use crate::store::context::CatalogueContext;

fn lookup_part_with(
    catalogue: &Catalogue,
    conn: &Connection,
    part_number: &str,
) -> EpcResult<QueryResult> {
    let Some(part) = find_part(conn, part_number)? else {
        debug!("Part {part_number} not in {}", catalogue.code());
        return Ok(QueryResult::empty());
    };
    let group = find_group(conn, &part.group_code)?;
    let name = match part.name_code.as_deref() {
        Some(code) => find_name(conn, code)?,
        None => None,
    };

    let text = format_part(&part, group.as_ref(), name.as_ref());
    let media = resolve_media(catalogue, &part.group_code);
    Ok(QueryResult { text, media })
}

pub fn lookup_part_impl(catalogue: &Catalogue, part_number: &str) -> EpcResult<QueryResult> {
    let conn = catalogue.connect()?;
    lookup_part_with(catalogue, &conn, part_number)
}

pub fn try_lookup_part(ctx: &CatalogueContext, part_number: &str) -> EpcResult<QueryResult> {
    lookup_part_impl(ctx.default_catalogue()?, part_number)
}

/// Detail and group images for one part number; empty when unknown or when
/// the catalogue cannot be read.
pub fn lookup_part(ctx: &CatalogueContext, part_number: &str) -> QueryResult {
    match try_lookup_part(ctx, part_number) {
        Ok(result) => result,
        Err(e) if e.is_unavailable() => {
            debug!("Part lookup for {part_number} skipped: {e}");
            QueryResult::empty()
        }
        Err(e) => {
            warn!("Part lookup for {part_number} failed: {e}");
            QueryResult::empty()
        }
    }
}
