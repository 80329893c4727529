//! PluginCatalog Core Library
//!
//! Embeddable catalog service for audio-plugin and preset metadata. Stores
//! records for installed instrument/effect plugins and user presets in a
//! local SQLite file, supports substring search, and exposes results both
//! as a JSON/HTTP API and as a C-callable interface so a host application
//! (e.g. a digital-audio-workstation) can link the service directly into
//! its process.
//!
//! # Architecture
//!
//! This library is designed to be consumed three ways:
//! - **In-process Rust**: call [`Catalog`] / `service` directly
//! - **HTTP**: the `http` module serves `/plugins/search.json` and
//!   `/presets.json` (see the `plugincatalog` binary)
//! - **Native hosts**: the `ffi` module exports `catalog_*` C symbols from
//!   the cdylib/staticlib builds
//!
//! # Core Features
//!
//! ## Records (`model` module)
//! - `Plugin` - installed plugin metadata (name, format, favorite flag)
//! - `Preset` - user preset metadata with soft-delete support
//!
//! ## Schema (`migrate` module)
//! - Ordered, named, idempotent migration steps recorded in the store
//! - Explicit copy steps for table renames; no structural auto-matching
//!
//! ## Search (`query` module)
//! - Parameterized containment (`LIKE '%term%'`) over record names with
//!   literal matching of wildcard characters
//! - Favorites filter, combinable with text search
//!
//! ## Orchestration (`service` module)
//! - `Catalog` - open → migrate → seed → query, one store handle per call

pub mod error;
pub mod ffi;
pub mod http;
pub mod migrate;
pub mod model;
pub mod query;
pub mod service;
pub mod store;

pub use error::CatalogError;
pub use model::{Plugin, Preset, PLUGIN_TABLE, PRESET_TABLE};
pub use service::Catalog;
pub use store::Store;
