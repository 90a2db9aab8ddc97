//! EPC core library: catalogue and VIN lookups behind a KIA Sportage parts
//! chat bot.
//!
//! The crate resolves part numbers, group codes, free-text group patterns and
//! VINs against read-only SQLite databases and renders the answers as
//! Telegram MarkdownV2 text plus group images. Chat transport is left to the
//! caller: build a `CatalogueContext` once, then hand each command to the
//! functions in `commands`.

pub mod commands;
pub mod config;
pub mod errors;
pub mod models;
pub mod query;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::EpcConfig;
pub use errors::{EpcError, EpcResult};
pub use models::QueryResult;
pub use store::context::CatalogueContext;
