//! Catalog service: record lifecycle and per-call orchestration.
//!
//! Free functions operate on an explicit [`Store`] handle. The [`Catalog`]
//! wrapper holds only the database path and opens a fresh handle per call
//! (open → work → drop), matching the one-unit-of-work-per-handle model the
//! exposure adapters rely on.
//!
//! Deletion semantics: plugin deletes are hard; preset deletes are soft
//! (`deleted_at` set, row retained, hidden from default search/list but
//! retrievable by id).

use std::path::PathBuf;

use chrono::Utc;
use rusqlite::params;
use tracing::info;

use crate::error::Result;
use crate::migrate::run_migrations;
use crate::model::{Plugin, Preset};
use crate::query;
use crate::store::{default_db_path, Store};

/// Insert a plugin record. The store assigns the id and both timestamps.
pub fn insert_plugin(store: &Store, name: &str, format: &str) -> Result<Plugin> {
    let now = Utc::now();
    store.conn().execute(
        "INSERT INTO plugins (created_at, updated_at, name, format, favorite)
         VALUES (?1, ?2, ?3, ?4, 0)",
        params![now, now, name, format],
    )?;
    Ok(Plugin {
        id: store.conn().last_insert_rowid(),
        created_at: now,
        updated_at: now,
        name: name.to_string(),
        format: format.to_string(),
        favorite: false,
    })
}

/// Insert a preset record.
pub fn insert_preset(store: &Store, name: &str, format: &str) -> Result<Preset> {
    let now = Utc::now();
    store.conn().execute(
        "INSERT INTO presets (created_at, updated_at, deleted_at, name, format)
         VALUES (?1, ?2, NULL, ?3, ?4)",
        params![now, now, name, format],
    )?;
    Ok(Preset {
        id: store.conn().last_insert_rowid(),
        created_at: now,
        updated_at: now,
        deleted_at: None,
        name: name.to_string(),
        format: format.to_string(),
    })
}

/// Rename a plugin, refreshing `updated_at`.
pub fn update_plugin_name(store: &Store, id: i64, name: &str) -> Result<()> {
    store.conn().execute(
        "UPDATE plugins SET name = ?1, updated_at = ?2 WHERE id = ?3",
        params![name, Utc::now(), id],
    )?;
    Ok(())
}

/// Flag or unflag a plugin as favorite, refreshing `updated_at`.
pub fn set_plugin_favorite(store: &Store, id: i64, favorite: bool) -> Result<()> {
    store.conn().execute(
        "UPDATE plugins SET favorite = ?1, updated_at = ?2 WHERE id = ?3",
        params![favorite, Utc::now(), id],
    )?;
    Ok(())
}

/// Hard-delete a plugin. The row is physically removed.
pub fn delete_plugin(store: &Store, id: i64) -> Result<()> {
    store
        .conn()
        .execute("DELETE FROM plugins WHERE id = ?1", params![id])?;
    Ok(())
}

/// Soft-delete a preset: the row is retained with `deleted_at` set and
/// disappears from default search/list results. Never resurrected there.
pub fn soft_delete_preset(store: &Store, id: i64) -> Result<()> {
    let now = Utc::now();
    store.conn().execute(
        "UPDATE presets SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2",
        params![now, id],
    )?;
    Ok(())
}

/// Direct id lookup. Returns soft-deleted presets too.
pub fn get_preset(store: &Store, id: i64) -> Result<Option<Preset>> {
    let result = store.conn().query_row(
        "SELECT id, created_at, updated_at, deleted_at, name, format
         FROM presets WHERE id = ?1",
        params![id],
        |row| {
            Ok(Preset {
                id: row.get(0)?,
                created_at: row.get(1)?,
                updated_at: row.get(2)?,
                deleted_at: row.get(3)?,
                name: row.get(4)?,
                format: row.get(5)?,
            })
        },
    );
    match result {
        Ok(preset) => Ok(Some(preset)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// First live preset in id order, if any.
pub fn first_preset(store: &Store) -> Result<Option<Preset>> {
    let result = store.conn().query_row(
        "SELECT id, created_at, updated_at, deleted_at, name, format
         FROM presets WHERE deleted_at IS NULL ORDER BY id ASC LIMIT 1",
        [],
        |row| {
            Ok(Preset {
                id: row.get(0)?,
                created_at: row.get(1)?,
                updated_at: row.get(2)?,
                deleted_at: row.get(3)?,
                name: row.get(4)?,
                format: row.get(5)?,
            })
        },
    );
    match result {
        Ok(preset) => Ok(Some(preset)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Count of live (not soft-deleted) presets.
pub fn preset_count(store: &Store) -> Result<i64> {
    let count = store.conn().query_row(
        "SELECT COUNT(*) FROM presets WHERE deleted_at IS NULL",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// First-run bootstrap data. Each table is seeded only when empty, so
/// calling this on a populated store inserts nothing.
pub fn seed(store: &Store) -> Result<()> {
    let plugin_count: i64 =
        store
            .conn()
            .query_row("SELECT COUNT(*) FROM plugins", [], |row| row.get(0))?;
    if plugin_count == 0 {
        insert_plugin(store, "Amplifier", "LV2")?;
        insert_plugin(store, "Compressor", "LV2")?;
        let reverb = insert_plugin(store, "Room Reverb", "VST3")?;
        set_plugin_favorite(store, reverb.id, true)?;
        info!("seeded plugins");
    }

    let preset_count: i64 =
        store
            .conn()
            .query_row("SELECT COUNT(*) FROM presets", [], |row| row.get(0))?;
    if preset_count == 0 {
        insert_preset(store, "Init", "LV2")?;
        insert_preset(store, "Warm Lead", "VST3")?;
        info!("seeded presets");
    }

    Ok(())
}

/// Handle-per-call facade over the catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    db_path: PathBuf,
}

impl Catalog {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Catalog at the path named by `CATALOG_DB` (default `catalog.db`).
    pub fn from_env() -> Self {
        Self::new(default_db_path())
    }

    /// Acquire a store handle scoped to one unit of work.
    pub fn open(&self) -> Result<Store> {
        Store::open(&self.db_path)
    }

    /// Bring the schema up to date. Fatal on failure; retry is safe.
    pub fn migrate(&self) -> Result<()> {
        let store = self.open()?;
        run_migrations(&store)
    }

    /// Insert bootstrap records unless the store is already populated.
    pub fn seed(&self) -> Result<()> {
        let store = self.open()?;
        seed(&store)
    }

    pub fn search_plugins(&self, term: &str) -> Result<Vec<Plugin>> {
        let store = self.open()?;
        query::search_plugins(store.conn(), term)
    }

    pub fn search_presets(&self, term: &str) -> Result<Vec<Preset>> {
        let store = self.open()?;
        query::search_presets(store.conn(), term)
    }

    pub fn favorite_plugins(&self, term: Option<&str>) -> Result<Vec<Plugin>> {
        let store = self.open()?;
        query::favorite_plugins(store.conn(), term)
    }

    pub fn first_preset(&self) -> Result<Option<Preset>> {
        let store = self.open()?;
        first_preset(&store)
    }

    pub fn preset_count(&self) -> Result<i64> {
        let store = self.open()?;
        preset_count(&store)
    }
}
