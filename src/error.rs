//! Catalog error taxonomy.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the catalog.
///
/// Open and migration failures are fatal to the requesting operation.
/// Search/list surfaces may degrade serialization and store faults to an
/// empty result; they never present a partial result as complete.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The backing database file or engine could not be opened.
    #[error("store unavailable at {path:?}: {source}")]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A schema migration step could not be applied. Already-applied steps
    /// stay intact; retrying the whole migration list is safe.
    #[error("migration step `{step}` failed: {source}")]
    MigrationFailed {
        step: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// A record could not be rendered to its external JSON representation.
    #[error("failed to serialize record: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// Malformed caller input (e.g. a null or non-UTF-8 native string),
    /// rejected before the store is touched.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A query or write against an open store failed.
    #[error("store operation failed: {0}")]
    Store(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
