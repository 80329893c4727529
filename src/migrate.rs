//! Schema migrations.
//!
//! The schema evolves through an explicit, ordered list of named steps.
//! Applied steps are recorded in a `schema_migrations` bookkeeping table.
//! Each step commits atomically with its bookkeeping row, and each step's
//! SQL is additionally guarded (`IF NOT EXISTS`, column-existence checks,
//! copy-only-missing-ids), so running the whole list again is a no-op and a
//! retry after a partial failure is always safe.
//!
//! Renames are never inferred from structure: moving data from an old table
//! name to a new one takes a dedicated step that copies rows before
//! dropping the old table (see `rename_records_to_presets`).

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::store::Store;

/// A single named schema change. Steps must be idempotent.
pub struct Migration {
    pub name: &'static str,
    apply: fn(&Connection) -> rusqlite::Result<()>,
}

/// All migrations, in dependency order: base entity tables first, then
/// additive columns, then legacy-name copies.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "create_plugins",
        apply: create_plugins,
    },
    Migration {
        name: "create_presets",
        apply: create_presets,
    },
    Migration {
        name: "add_plugin_favorite",
        apply: add_plugin_favorite,
    },
    Migration {
        name: "rename_records_to_presets",
        apply: rename_records_to_presets,
    },
];

/// Bring the store's schema up to date with the current record model.
///
/// Idempotent: already-applied steps are skipped. A failing step leaves
/// previously applied steps intact and surfaces as
/// [`CatalogError::MigrationFailed`].
pub fn run_migrations(store: &Store) -> Result<()> {
    let conn = store.conn();

    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
             name TEXT PRIMARY KEY,
             applied_at TEXT NOT NULL
         )",
        [],
    )
    .map_err(|source| CatalogError::MigrationFailed {
        step: "schema_migrations",
        source,
    })?;

    for migration in MIGRATIONS {
        let applied: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE name = ?1)",
                params![migration.name],
                |row| row.get(0),
            )
            .map_err(|source| CatalogError::MigrationFailed {
                step: migration.name,
                source,
            })?;
        if applied {
            debug!(step = migration.name, "migration already applied");
            continue;
        }

        // A step and its bookkeeping row land atomically: a failure mid-step
        // rolls everything back, so the store never holds a step's effects
        // without the step being recorded.
        let tx = conn
            .unchecked_transaction()
            .map_err(|source| CatalogError::MigrationFailed {
                step: migration.name,
                source,
            })?;
        (migration.apply)(&tx).map_err(|source| CatalogError::MigrationFailed {
            step: migration.name,
            source,
        })?;
        tx.execute(
            "INSERT INTO schema_migrations (name, applied_at) VALUES (?1, ?2)",
            params![migration.name, Utc::now()],
        )
        .map_err(|source| CatalogError::MigrationFailed {
            step: migration.name,
            source,
        })?;
        tx.commit().map_err(|source| CatalogError::MigrationFailed {
            step: migration.name,
            source,
        })?;
        info!(step = migration.name, "applied migration");
    }

    Ok(())
}

fn create_plugins(conn: &Connection) -> rusqlite::Result<()> {
    // `favorite` arrived later; add_plugin_favorite appends it.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS plugins (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             created_at TEXT NOT NULL,
             updated_at TEXT NOT NULL,
             name TEXT NOT NULL,
             format TEXT NOT NULL
         )",
        [],
    )?;
    Ok(())
}

fn create_presets(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS presets (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             created_at TEXT NOT NULL,
             updated_at TEXT NOT NULL,
             deleted_at TEXT,
             name TEXT NOT NULL,
             format TEXT NOT NULL
         )",
        [],
    )?;
    Ok(())
}

/// Additive change: existing rows backfill to not-favorite, no data loss.
fn add_plugin_favorite(conn: &Connection) -> rusqlite::Result<()> {
    if !column_exists(conn, "plugins", "favorite")? {
        conn.execute(
            "ALTER TABLE plugins ADD COLUMN favorite INTEGER NOT NULL DEFAULT 0",
            [],
        )?;
    }
    Ok(())
}

/// Early releases persisted presets under a generic `records` table. Copy
/// its rows (ids included, so identity survives) into `presets` and drop
/// the old table. The copy skips ids already present in `presets`, so
/// retrying after an interrupted earlier attempt never duplicates rows.
fn rename_records_to_presets(conn: &Connection) -> rusqlite::Result<()> {
    if !table_exists(conn, "records")? {
        return Ok(());
    }
    conn.execute(
        "INSERT INTO presets (id, created_at, updated_at, deleted_at, name, format)
         SELECT id, created_at, updated_at, deleted_at, name, format FROM records
         WHERE id NOT IN (SELECT id FROM presets)",
        [],
    )?;
    conn.execute("DROP TABLE records", [])?;
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        params![table],
        |row| row.get(0),
    )
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_dump(store: &Store) -> Vec<String> {
        let mut stmt = store
            .conn()
            .prepare("SELECT COALESCE(sql, '') FROM sqlite_master ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<Vec<String>>>()
            .unwrap()
    }

    fn row_count(store: &Store, table: &str) -> i64 {
        store
            .conn()
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .unwrap()
    }

    #[test]
    fn migrations_are_idempotent() {
        let store = Store::open_in_memory().unwrap();

        run_migrations(&store).unwrap();
        let first = schema_dump(&store);
        let applied = row_count(&store, "schema_migrations");

        run_migrations(&store).unwrap();
        assert_eq!(schema_dump(&store), first);
        assert_eq!(row_count(&store, "schema_migrations"), applied);
    }

    #[test]
    fn creates_entity_tables_with_favorite_column() {
        let store = Store::open_in_memory().unwrap();
        run_migrations(&store).unwrap();

        assert!(table_exists(store.conn(), "plugins").unwrap());
        assert!(table_exists(store.conn(), "presets").unwrap());
        assert!(column_exists(store.conn(), "plugins", "favorite").unwrap());
    }

    #[test]
    fn rename_step_retries_cleanly_after_interrupted_copy() {
        let store = Store::open_in_memory().unwrap();

        // Earlier attempt copied part of the rows: presets already holds
        // one, `records` still exists, and the step was never recorded. A
        // retry must finish the copy without duplicating anything.
        store
            .conn()
            .execute_batch(
                "CREATE TABLE records (
                     id INTEGER PRIMARY KEY AUTOINCREMENT,
                     created_at TEXT NOT NULL,
                     updated_at TEXT NOT NULL,
                     deleted_at TEXT,
                     name TEXT NOT NULL,
                     format TEXT NOT NULL
                 );
                 INSERT INTO records (id, created_at, updated_at, deleted_at, name, format)
                 VALUES (1, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z', NULL, 'Init', 'LV2'),
                        (2, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z', NULL, 'Warm Lead', 'LV2');
                 CREATE TABLE presets (
                     id INTEGER PRIMARY KEY AUTOINCREMENT,
                     created_at TEXT NOT NULL,
                     updated_at TEXT NOT NULL,
                     deleted_at TEXT,
                     name TEXT NOT NULL,
                     format TEXT NOT NULL
                 );
                 INSERT INTO presets SELECT * FROM records WHERE id = 1;",
            )
            .unwrap();

        run_migrations(&store).unwrap();
        run_migrations(&store).unwrap();

        assert!(!table_exists(store.conn(), "records").unwrap());
        assert_eq!(row_count(&store, "presets"), 2);
    }

    #[test]
    fn rename_step_copies_legacy_records_into_presets() {
        let store = Store::open_in_memory().unwrap();

        // Legacy layout: presets lived in a generic `records` table.
        store
            .conn()
            .execute_batch(
                "CREATE TABLE records (
                     id INTEGER PRIMARY KEY AUTOINCREMENT,
                     created_at TEXT NOT NULL,
                     updated_at TEXT NOT NULL,
                     deleted_at TEXT,
                     name TEXT NOT NULL,
                     format TEXT NOT NULL
                 );
                 INSERT INTO records (id, created_at, updated_at, deleted_at, name, format)
                 VALUES (3, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z', NULL, 'Warm Lead', 'LV2');",
            )
            .unwrap();

        run_migrations(&store).unwrap();

        assert!(!table_exists(store.conn(), "records").unwrap());
        let (id, name): (i64, String) = store
            .conn()
            .query_row("SELECT id, name FROM presets", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(id, 3);
        assert_eq!(name, "Warm Lead");
    }
}
