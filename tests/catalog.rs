//! End-to-end catalog flow: migrate, seed, search, and the native export
//! round trip.

use std::ffi::{CStr, CString};

use plugincatalog_core::ffi;
use plugincatalog_core::{Catalog, Plugin};

#[test]
fn seeded_catalog_search_and_native_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("catalog.db");

    // The native exports resolve their database through CATALOG_DB. All
    // env-dependent assertions live in this one test to avoid races.
    std::env::set_var("CATALOG_DB", &db_path);

    assert_eq!(ffi::catalog_migrate(), 0);

    let catalog = Catalog::new(&db_path);
    catalog.seed().unwrap();
    catalog.seed().unwrap(); // second seed inserts nothing

    // "ss" only occurs in "Compressor".
    let hits = catalog.search_plugins("ss").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Compressor");

    assert!(catalog.search_plugins("zzz").unwrap().is_empty());
    assert!(catalog.search_plugins("").unwrap().is_empty());

    // Seeded presets are live and countable through the native export.
    assert_eq!(ffi::catalog_preset_count(), 2);

    let term = CString::new("Amp").unwrap();
    let json_ptr = unsafe { ffi::catalog_plugin_search(term.as_ptr()) };
    assert!(!json_ptr.is_null());

    let json = unsafe { CStr::from_ptr(json_ptr) }.to_str().unwrap();
    let plugins: Vec<Plugin> = serde_json::from_str(json).unwrap();
    assert_eq!(plugins.len(), 1);
    assert_eq!(plugins[0].name, "Amplifier");

    unsafe { ffi::catalog_free_string(json_ptr) };

    // Invalid input is rejected before the store is touched.
    assert!(unsafe { ffi::catalog_plugin_search(std::ptr::null()) }.is_null());
}

#[test]
fn migrate_twice_then_search_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::new(dir.path().join("catalog.db"));

    catalog.migrate().unwrap();
    catalog.migrate().unwrap();
    catalog.seed().unwrap();

    let favorites = catalog.favorite_plugins(None).unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].name, "Room Reverb");

    let first = catalog.first_preset().unwrap().unwrap();
    assert_eq!(first.name, "Init");
    assert!(first.deleted_at.is_none());
}
