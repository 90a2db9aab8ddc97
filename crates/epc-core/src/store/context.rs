//! The set of opened backends, built once at startup and passed by reference
//! to every lookup.
//!
//! Opening never fails as a whole. A backend that is missing or lacks its
//! tables is logged and left out; lookups that need it then get
//! `EpcError::CatalogueUnavailable`, which the resolvers render the same way
//! as an empty result.

use std::collections::BTreeMap;

use rusqlite::params;
use tracing::{debug, info, warn};

use crate::config::EpcConfig;
use crate::errors::{EpcError, EpcResult};
use crate::store::catalogue::Catalogue;
use crate::store::database::StoreHandle;
use crate::store::schema;

#[derive(Debug)]
pub struct CatalogueContext {
    config: EpcConfig,
    vin_registry: Option<StoreHandle>,
    catalogues: BTreeMap<String, Catalogue>,
}

impl CatalogueContext {
    /// Open the VIN registry, read the EPC index and register every catalogue
    /// of the configured group type.
    pub fn open(config: EpcConfig) -> Self {
        let vin_registry = match StoreHandle::open(
            "VIN_RU",
            &config.vin_database_path(),
            schema::VIN_TABLES,
        ) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("VIN registry disabled: {e}");
                None
            }
        };

        let mut catalogues = BTreeMap::new();
        match listed_catalogues(&config) {
            Ok(codes) => {
                for code in codes {
                    match open_catalogue(&config, &code) {
                        Ok(catalogue) => {
                            debug!("Registered catalogue {code}");
                            catalogues.insert(code, catalogue);
                        }
                        Err(e) => warn!("Catalogue {code} skipped: {e}"),
                    }
                }
            }
            Err(e) => warn!("EPC index unavailable, no catalogues registered: {e}"),
        }

        info!(
            "Catalogue context ready: vin_registry={}, catalogues={}",
            vin_registry.is_some(),
            catalogues.len()
        );

        Self {
            config,
            vin_registry,
            catalogues,
        }
    }

    pub fn config(&self) -> &EpcConfig {
        &self.config
    }

    pub fn vin_registry(&self) -> EpcResult<&StoreHandle> {
        self.vin_registry
            .as_ref()
            .ok_or_else(|| EpcError::CatalogueUnavailable("VIN_RU".to_string()))
    }

    pub fn catalogue(&self, code: &str) -> EpcResult<&Catalogue> {
        self.catalogues
            .get(code)
            .ok_or_else(|| EpcError::CatalogueUnavailable(code.to_string()))
    }

    /// The catalogue part and group queries run against.
    pub fn default_catalogue(&self) -> EpcResult<&Catalogue> {
        self.catalogue(&self.config.default_catalogue)
    }

    pub fn catalogue_codes(&self) -> impl Iterator<Item = &str> {
        self.catalogues.keys().map(String::as_str)
    }
}

/// Catalogue codes listed in `MDBCATPF` for the configured group type.
fn listed_catalogues(config: &EpcConfig) -> EpcResult<Vec<String>> {
    let index = StoreHandle::open("EPC", &config.epc_database_path(), schema::EPC_TABLES)?;
    let conn = index.connect()?;
    let mut stmt =
        conn.prepare("SELECT CMBPNO FROM MDBCATPF WHERE CMGRTY = ?1 ORDER BY CMBPNO;")?;
    let codes = stmt
        .query_map(params![config.catalogue_group_type], |row| {
            row.get::<_, String>(0)
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(codes
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect())
}

fn open_catalogue(config: &EpcConfig, code: &str) -> EpcResult<Catalogue> {
    let store = StoreHandle::open(code, &config.catalogue_path(code), schema::CATALOGUE_TABLES)?;
    Ok(Catalogue::new(
        code,
        store,
        config.media_root(code),
        &config.media_extension,
    ))
}
