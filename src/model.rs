//! Catalog record types.
//!
//! `Plugin` and `Preset` share the same base shape: a store-assigned `id`
//! plus `created_at`/`updated_at` timestamps maintained by the store layer.
//! Each entity maps to a stable table name ([`PLUGIN_TABLE`],
//! [`PRESET_TABLE`]) so migrations and queries stay name-stable even if the
//! Rust types are renamed.
//!
//! JSON serialization emits exactly the declared fields. `deleted_at` on a
//! preset is always emitted, `null` when unset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable storage name for plugin records.
pub const PLUGIN_TABLE: &str = "plugins";

/// Stable storage name for preset records.
pub const PRESET_TABLE: &str = "presets";

/// An installed instrument or effect plugin.
///
/// `id` is assigned by the store on insert and never changes. `name` is the
/// only field containment search runs against; `format` is an open tag such
/// as "LV2" or "VST3".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub format: String,
    pub favorite: bool,
}

/// A user preset.
///
/// Presets are soft-deleted: setting `deleted_at` hides the record from
/// default search/list results while the row stays retrievable by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub name: String,
    pub format: String,
}
