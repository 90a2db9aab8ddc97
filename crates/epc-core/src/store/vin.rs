//! Lookups against the VIN registry.

use rusqlite::{params, Connection, Row};

use crate::errors::EpcResult;
use crate::models::VinRecord;
use crate::store::database::{text_column, text_or_empty};

fn vin_from_row(row: &Row<'_>) -> rusqlite::Result<VinRecord> {
    Ok(VinRecord {
        vin: text_or_empty(row, 0)?,
        fingerprint: text_column(row, 1)?,
        engine: text_column(row, 2)?,
        production_date: text_column(row, 3)?,
        sale_date: text_column(row, 4)?,
        modification: text_column(row, 5)?,
        trim: text_column(row, 6)?,
        paint: text_column(row, 7)?,
    })
}

/// All registry rows for `vin`, in storage order.
pub fn find_vin(conn: &Connection, vin: &str) -> EpcResult<Vec<VinRecord>> {
    let mut stmt = conn.prepare(
        "SELECT VINRU, VINKR, ENGINE, PDATE, SDATE, MOD, TRIM, PAINT \
         FROM VIN_RU WHERE VINRU = ?1 ORDER BY rowid;",
    )?;
    let rows = stmt
        .query_map(params![vin], vin_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CatalogueFixture;

    #[test]
    fn test_find_vin_returns_every_variant_in_order() {
        let fixture = CatalogueFixture::new();
        fixture.vin(&VinRecord {
            vin: "X4XJA563000000001".to_string(),
            fingerprint: Some("KNAJA55B000000001".to_string()),
            engine: Some("FE123".to_string()),
            ..VinRecord::default()
        });
        fixture.vin(&VinRecord {
            vin: "X4XJA563000000001".to_string(),
            fingerprint: None,
            paint: Some("UD".to_string()),
            ..VinRecord::default()
        });
        let conn = fixture.connect_vin();

        let rows = find_vin(&conn, "X4XJA563000000001").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].engine.as_deref(), Some("FE123"));
        assert_eq!(rows[1].fingerprint, None);
        assert!(find_vin(&conn, "X4XJA563000000002").unwrap().is_empty());
    }
}
