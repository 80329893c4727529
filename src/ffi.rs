//! FFI (Foreign Function Interface) bindings for host embedding.
//!
//! This module exposes the catalog through C-compatible functions so a host
//! application (e.g. a DAW) can link the service directly into its process.
//!
//! # Memory Management
//!
//! - Rust allocates every returned string and ownership transfers to the
//!   caller
//! - The caller MUST pass each returned string to `catalog_free_string` to
//!   prevent leaks
//! - Strings are null-terminated UTF-8 in both directions
//!
//! # Usage from C
//!
//! ```c
//! if (catalog_migrate() != 0) { /* fatal: schema out of date */ }
//!
//! char *json = catalog_plugin_search("Amp");
//! if (json != NULL) {
//!     /* parse JSON array ... */
//!     catalog_free_string(json);
//! }
//! ```
//!
//! The database path comes from the `CATALOG_DB` environment variable
//! (default `catalog.db`). Each call opens its own store handle and closes
//! it before returning.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;

use tracing::error;

use crate::service::Catalog;

/// Bring the catalog schema up to date.
/// Returns 0 on success, 1 on failure. Safe to call repeatedly.
#[no_mangle]
pub extern "C" fn catalog_migrate() -> c_int {
    match Catalog::from_env().migrate() {
        Ok(()) => 0,
        Err(e) => {
            error!("migration failed: {e}");
            1
        }
    }
}

/// Count of live preset records, saturating at `c_int::MAX`.
/// Returns -1 if the store cannot be reached or queried.
#[no_mangle]
pub extern "C" fn catalog_preset_count() -> c_int {
    match Catalog::from_env().preset_count() {
        Ok(count) => clamp_count(count),
        Err(e) => {
            error!("preset count failed: {e}");
            -1
        }
    }
}

// Counts wider than c_int saturate rather than wrap; a wrapped value could
// collide with the -1 error code.
fn clamp_count(count: i64) -> c_int {
    c_int::try_from(count).unwrap_or(c_int::MAX)
}

/// Search plugins whose name contains `term`.
/// Returns a newly allocated JSON array as a null-terminated string, or
/// null on invalid input or store failure.
/// Caller MUST call catalog_free_string() when done.
///
/// # Safety
///
/// `term` must be null or point to a valid null-terminated string.
#[no_mangle]
pub unsafe extern "C" fn catalog_plugin_search(term: *const c_char) -> *mut c_char {
    if term.is_null() {
        error!("invalid input: null search term");
        return ptr::null_mut();
    }

    let term = match unsafe { CStr::from_ptr(term) }.to_str() {
        Ok(s) => s,
        Err(_) => {
            error!("invalid input: search term is not UTF-8");
            return ptr::null_mut();
        }
    };

    let plugins = match Catalog::from_env().search_plugins(term) {
        Ok(plugins) => plugins,
        Err(e) => {
            error!("plugin search failed: {e}");
            return ptr::null_mut();
        }
    };

    match serde_json::to_string(&plugins) {
        Ok(json) => string_to_c_char(&json),
        Err(e) => {
            error!("failed to serialize search results: {e}");
            ptr::null_mut()
        }
    }
}

/// Free a string returned by FFI functions.
///
/// # Safety
///
/// `s` must be null or a pointer previously returned by this module, passed
/// in at most once.
#[no_mangle]
pub unsafe extern "C" fn catalog_free_string(s: *mut c_char) {
    free_c_char(s);
}

fn string_to_c_char(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(c_str) => c_str.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn free_c_char(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            let _ = CString::from_raw(s);
        }
    }
}
