//! On-disk fixtures laid out the way a deployment is: `EPC.db`,
//! `VIN_RU.db`, `PC/<catalogue>.db` and `GROUP/<catalogue>/` under one
//! temporary data directory.

use std::path::Path;

use rusqlite::{params, Connection};
use tempfile::TempDir;

use crate::config::EpcConfig;
use crate::models::VinRecord;
use crate::store::catalogue::Catalogue;
use crate::store::context::CatalogueContext;
use crate::store::schema;

pub const FIXTURE_CATALOGUE: &str = "GENKFM002A";

pub struct CatalogueFixture {
    dir: TempDir,
}

impl CatalogueFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let fixture = Self { dir };
        let config = fixture.config();

        std::fs::create_dir_all(config.catalogue_path(FIXTURE_CATALOGUE).parent().unwrap())
            .unwrap();
        std::fs::create_dir_all(config.media_root(FIXTURE_CATALOGUE)).unwrap();

        let epc = Connection::open(config.epc_database_path()).unwrap();
        schema::apply_statements(&epc, schema::EPC_STATEMENTS).unwrap();
        let catalogue = Connection::open(config.catalogue_path(FIXTURE_CATALOGUE)).unwrap();
        schema::apply_statements(&catalogue, schema::CATALOGUE_STATEMENTS).unwrap();
        let vin = Connection::open(config.vin_database_path()).unwrap();
        schema::apply_statements(&vin, schema::VIN_STATEMENTS).unwrap();

        fixture.list_catalogue(FIXTURE_CATALOGUE, "FM");
        fixture
    }

    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> EpcConfig {
        EpcConfig {
            data_dir: self.data_dir().to_path_buf(),
            ..EpcConfig::default()
        }
    }

    pub fn context(&self) -> CatalogueContext {
        CatalogueContext::open(self.config())
    }

    pub fn context_with(&self, config: EpcConfig) -> CatalogueContext {
        CatalogueContext::open(config)
    }

    pub fn catalogue(&self) -> Catalogue {
        self.context().default_catalogue().unwrap().clone()
    }

    /// Writable connection to the catalogue database.
    pub fn connect(&self) -> Connection {
        Connection::open(self.config().catalogue_path(FIXTURE_CATALOGUE)).unwrap()
    }

    pub fn connect_vin(&self) -> Connection {
        Connection::open(self.config().vin_database_path()).unwrap()
    }

    pub fn list_catalogue(&self, code: &str, group_type: &str) {
        Connection::open(self.config().epc_database_path())
            .unwrap()
            .execute(
                "INSERT INTO MDBCATPF (CMBPNO, CMGRTY) VALUES (?1, ?2);",
                params![code, group_type],
            )
            .unwrap();
    }

    pub fn group(&self, code: &str, english: &str, russian: &str) {
        self.connect()
            .execute(
                "INSERT INTO MDBGNMPF (GNGRNO, GNLGEG, GNLGRU) VALUES (?1, ?2, ?3);",
                params![code, english, russian],
            )
            .unwrap();
    }

    pub fn name(&self, code: &str, english: &str, russian: &str) {
        self.connect()
            .execute(
                "INSERT INTO MDBPNCPF (PNPNCD, PNLGEG, PNLGRU) VALUES (?1, ?2, ?3);",
                params![code, english, russian],
            )
            .unwrap();
    }

    pub fn part(
        &self,
        part_number: &str,
        group_code: &str,
        name_code: Option<&str>,
        key_number: i64,
        quantity: &str,
        remark: Option<&str>,
    ) {
        self.connect()
            .execute(
                "INSERT INTO MDBCDMPF (CDPTNO, CDGRNO, CDPNCD, CDKEY1, CDCQTY, CDREMK) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![part_number, group_code, name_code, key_number, quantity, remark],
            )
            .unwrap();
    }

    pub fn vin(&self, record: &VinRecord) {
        self.connect_vin()
            .execute(
                "INSERT INTO VIN_RU (VINRU, VINKR, ENGINE, PDATE, SDATE, MOD, TRIM, PAINT) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                params![
                    record.vin,
                    record.fingerprint,
                    record.engine,
                    record.production_date,
                    record.sale_date,
                    record.modification,
                    record.trim,
                    record.paint,
                ],
            )
            .unwrap();
    }

    pub fn remove_vin_registry(&self) {
        std::fs::remove_file(self.config().vin_database_path()).unwrap();
    }

    /// Write a placeholder image `<group><index>1.png`.
    pub fn image(&self, group_code: &str, index: usize) {
        let path = self
            .config()
            .media_root(FIXTURE_CATALOGUE)
            .join(format!("{group_code}{index}1.png"));
        std::fs::write(path, b"\x89PNG\r\n\x1a\n").unwrap();
    }
}
