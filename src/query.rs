//! Containment search and favorites queries.
//!
//! Search terms are always bound as parameters, never concatenated into
//! SQL. `%`, `_` and the escape character itself are escaped so a term
//! containing LIKE metacharacters matches literally; wildcard passthrough
//! is deliberately not a feature. Entity table names are compile-time
//! constants, so no identifier is ever built from caller input.
//!
//! Results are ordered by ascending id so queries are reproducible.

use rusqlite::{params, Connection, Row};

use crate::error::Result;
use crate::model::{Plugin, Preset, PLUGIN_TABLE, PRESET_TABLE};

const PLUGIN_COLUMNS: &str = "id, created_at, updated_at, name, format, favorite";
const PRESET_COLUMNS: &str = "id, created_at, updated_at, deleted_at, name, format";

/// Escape LIKE metacharacters (`%`, `_`) and the `\` escape character so a
/// term matches literally inside a `LIKE ... ESCAPE '\'` pattern.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

fn plugin_from_row(row: &Row<'_>) -> rusqlite::Result<Plugin> {
    Ok(Plugin {
        id: row.get(0)?,
        created_at: row.get(1)?,
        updated_at: row.get(2)?,
        name: row.get(3)?,
        format: row.get(4)?,
        favorite: row.get(5)?,
    })
}

fn preset_from_row(row: &Row<'_>) -> rusqlite::Result<Preset> {
    Ok(Preset {
        id: row.get(0)?,
        created_at: row.get(1)?,
        updated_at: row.get(2)?,
        deleted_at: row.get(3)?,
        name: row.get(4)?,
        format: row.get(5)?,
    })
}

/// Plugins whose name contains `term`. An empty term short-circuits to an
/// empty result before touching the store; it never means "match all".
pub fn search_plugins(conn: &Connection, term: &str) -> Result<Vec<Plugin>> {
    if term.is_empty() {
        return Ok(Vec::new());
    }
    let mut stmt = conn.prepare(&format!(
        "SELECT {PLUGIN_COLUMNS} FROM {PLUGIN_TABLE}
         WHERE name LIKE ?1 ESCAPE '\\' ORDER BY id ASC"
    ))?;
    let rows = stmt.query_map(params![contains_pattern(term)], plugin_from_row)?;
    let mut plugins = Vec::new();
    for row in rows {
        plugins.push(row?);
    }
    Ok(plugins)
}

/// Presets whose name contains `term`. Soft-deleted rows are excluded.
pub fn search_presets(conn: &Connection, term: &str) -> Result<Vec<Preset>> {
    if term.is_empty() {
        return Ok(Vec::new());
    }
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRESET_COLUMNS} FROM {PRESET_TABLE}
         WHERE deleted_at IS NULL AND name LIKE ?1 ESCAPE '\\' ORDER BY id ASC"
    ))?;
    let rows = stmt.query_map(params![contains_pattern(term)], preset_from_row)?;
    let mut presets = Vec::new();
    for row in rows {
        presets.push(row?);
    }
    Ok(presets)
}

/// Plugins flagged as favorite, optionally narrowed by a containment term.
/// As with [`search_plugins`], an explicitly empty term yields nothing.
pub fn favorite_plugins(conn: &Connection, term: Option<&str>) -> Result<Vec<Plugin>> {
    let mut plugins = Vec::new();
    match term {
        Some("") => return Ok(plugins),
        Some(term) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PLUGIN_COLUMNS} FROM {PLUGIN_TABLE}
                 WHERE favorite = 1 AND name LIKE ?1 ESCAPE '\\' ORDER BY id ASC"
            ))?;
            let rows = stmt.query_map(params![contains_pattern(term)], plugin_from_row)?;
            for row in rows {
                plugins.push(row?);
            }
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PLUGIN_COLUMNS} FROM {PLUGIN_TABLE} WHERE favorite = 1 ORDER BY id ASC"
            ))?;
            let rows = stmt.query_map([], plugin_from_row)?;
            for row in rows {
                plugins.push(row?);
            }
        }
    }
    Ok(plugins)
}
