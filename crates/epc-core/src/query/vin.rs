//! VIN registry lookup.

use tracing::{debug, warn};

use crate::errors::EpcResult;
use crate::models::VinRecord;
use crate::query::markdown::{escape_code, escape_markdown};
use crate::store::context::CatalogueContext;
use crate::store::vin::find_vin;

pub const NO_RESULTS_MESSAGE: &str = "Очень жаль, но поиск не дал результатов\\.";
const FINGERPRINT_MISSING: &str = "_НОМЕР НЕ НАЙДЕН_";

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn render_record(index: usize, record: &VinRecord) -> Vec<String> {
    let mut lines = Vec::with_capacity(7);
    match non_blank(record.fingerprint.as_deref()) {
        Some(fingerprint) => lines.push(format!("{index}\\. `{}`", escape_code(fingerprint))),
        None => lines.push(format!("{index}\\. {FINGERPRINT_MISSING}")),
    }
    for (label, value) in record.labelled_fields() {
        if let Some(value) = non_blank(value) {
            lines.push(format!("{label}: *{}*", escape_markdown(value)));
        }
    }
    lines
}

/// Numbered blocks, one per registry row, separated by a blank line.
pub fn render_vin_records(records: &[VinRecord]) -> String {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| render_record(i + 1, record).join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn try_find_vin(ctx: &CatalogueContext, vin: &str) -> EpcResult<Vec<VinRecord>> {
    let conn = ctx.vin_registry()?.connect()?;
    find_vin(&conn, vin)
}

/// Registry rows for `vin`; empty when the registry is unavailable.
pub fn vin_records(ctx: &CatalogueContext, vin: &str) -> Vec<VinRecord> {
    match try_find_vin(ctx, vin) {
        Ok(records) => records,
        Err(e) if e.is_unavailable() => {
            debug!("VIN lookup for {vin} skipped: {e}");
            Vec::new()
        }
        Err(e) => {
            warn!("VIN lookup for {vin} failed: {e}");
            Vec::new()
        }
    }
}

/// Rendered registry entries for `vin`, or the fixed no-results message.
pub fn resolve_vin(ctx: &CatalogueContext, vin: &str) -> String {
    let records = vin_records(ctx, vin);
    if records.is_empty() {
        NO_RESULTS_MESSAGE.to_string()
    } else {
        render_vin_records(&records)
    }
}
