//! Runtime settings loaded from the JSON settings file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::errors::{EpcError, EpcResult};

/// Number of matched groups up to which a compact, illustrated listing is
/// produced. Above it only a plain listing is returned.
pub const DEFAULT_COMPACT_THRESHOLD: usize = 4;

/// Settings for locating the VIN registry, the EPC index, the per-catalogue
/// databases and the group images.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EpcConfig {
    /// Chat transport token. Carried through untouched.
    pub api_token: String,
    /// Base directory every other relative path is resolved against.
    pub data_dir: PathBuf,
    pub vin_database: PathBuf,
    pub epc_database: PathBuf,
    /// Directory holding one `<catalogue>.db` per catalogue.
    pub catalogue_dir: PathBuf,
    /// `MDBCATPF.CMGRTY` value selecting which catalogues to register.
    pub catalogue_group_type: String,
    /// Catalogue used for part and group lookups.
    pub default_catalogue: String,
    pub media_dir: PathBuf,
    pub media_extension: String,
    pub compact_threshold: usize,
}

impl Default for EpcConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            data_dir: PathBuf::from("."),
            vin_database: PathBuf::from("VIN_RU.db"),
            epc_database: PathBuf::from("EPC.db"),
            catalogue_dir: PathBuf::from("PC"),
            catalogue_group_type: "FM".to_string(),
            default_catalogue: "GENKFM002A".to_string(),
            media_dir: PathBuf::from("GROUP"),
            media_extension: "png".to_string(),
            compact_threshold: DEFAULT_COMPACT_THRESHOLD,
        }
    }
}

impl EpcConfig {
    /// Read settings from `path`.
    ///
    /// A missing or unreadable file is an error. Malformed JSON is not: it is
    /// logged and the defaults are used, so a broken settings file still
    /// starts the engine against the conventional layout.
    pub fn load(path: &Path) -> EpcResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut config = match Self::from_json(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring malformed settings file {}: {e}", path.display());
                Self::default()
            }
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> EpcResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// `EPC_DATA_DIR` and `EPC_DEFAULT_CATALOGUE` take precedence over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Some(dir) = env_value("EPC_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(code) = env_value("EPC_DEFAULT_CATALOGUE") {
            self.default_catalogue = code;
        }
    }

    pub fn validate(&self) -> EpcResult<()> {
        if self.compact_threshold < 2 {
            return Err(EpcError::Config(format!(
                "compact_threshold must be at least 2, got {}",
                self.compact_threshold
            )));
        }
        if self.default_catalogue.trim().is_empty() {
            return Err(EpcError::Config(
                "default_catalogue must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    pub fn vin_database_path(&self) -> PathBuf {
        self.resolve(&self.vin_database)
    }

    pub fn epc_database_path(&self) -> PathBuf {
        self.resolve(&self.epc_database)
    }

    pub fn catalogue_path(&self, catalogue: &str) -> PathBuf {
        self.resolve(&self.catalogue_dir)
            .join(format!("{catalogue}.db"))
    }

    /// Directory holding the images of one catalogue's groups.
    pub fn media_root(&self, catalogue: &str) -> PathBuf {
        self.resolve(&self.media_dir).join(catalogue)
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
