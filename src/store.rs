//! Store handle lifecycle.
//!
//! Every catalog operation opens a [`Store`] scoped to the call: the
//! underlying SQLite connection closes when the handle drops, on every exit
//! path including errors, so a failing operation never leaks a handle.
//! There is no ambient/global connection; callers thread the handle through
//! explicitly.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::error::{CatalogError, Result};

/// Environment variable selecting the database file path.
pub const DB_PATH_ENV: &str = "CATALOG_DB";

const DEFAULT_DB_PATH: &str = "catalog.db";

/// A scoped handle to the persistent store.
///
/// Dropping the handle releases the connection; SQLite itself serializes
/// concurrent writers across handles.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| CatalogError::StoreUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self { conn })
    }

    /// Open an ephemeral in-memory store. Useful for tests and throwaway
    /// catalogs; the data vanishes when the handle drops.
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|source| CatalogError::StoreUnavailable {
                path: PathBuf::from(":memory:"),
                source,
            })?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Resolve the database path from `CATALOG_DB`, defaulting to `catalog.db`
/// in the working directory.
pub fn default_db_path() -> PathBuf {
    std::env::var(DB_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");

        let store = Store::open(&path).unwrap();
        drop(store);

        assert!(path.exists());
    }

    #[test]
    fn open_fails_for_unreachable_path() {
        let err = Store::open(Path::new("/nonexistent/dir/catalog.db")).unwrap_err();
        assert!(matches!(err, CatalogError::StoreUnavailable { .. }));
    }
}
