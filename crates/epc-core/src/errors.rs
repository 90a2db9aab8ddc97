//! Error types for the EPC core library.

/// Top-level error enum for the EPC core library.
#[derive(Debug, thiserror::Error)]
pub enum EpcError {
    #[error("Catalogue unavailable: {0}")]
    CatalogueUnavailable(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EpcError {
    /// True when the error means "no backing store", as opposed to a failure
    /// while reading one that exists.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, EpcError::CatalogueUnavailable(_))
    }
}

pub type EpcResult<T> = Result<T, EpcError>;
