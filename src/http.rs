//! HTTP JSON adapter.
//!
//! Two endpoints, both `200` in all observed cases:
//!
//! - `GET /plugins/search.json?q=<term>`: JSON array of plugins whose name
//!   contains `<term>`; a missing or empty `q` yields `[]`.
//! - `GET /presets.json`: JSON object of the first preset, `null` when the
//!   table is empty. A smoke-test endpoint.
//!
//! Store failures degrade to an empty body and are logged; a partial result
//! is never presented as complete. Each request opens and drops its own
//! store handle; the blocking store work runs on the tokio blocking pool.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::model::{Plugin, Preset};
use crate::service::Catalog;

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<Catalog>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Build the catalog router.
pub fn router(catalog: Catalog) -> Router {
    let state = AppState {
        catalog: Arc::new(catalog),
    };
    Router::new()
        .route("/plugins/search.json", get(search_plugins))
        .route("/presets.json", get(first_preset))
        .with_state(state)
}

/// Bind `addr` and serve the catalog until the task is shut down.
pub async fn serve(catalog: Catalog, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(catalog);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("catalog listening on http://{}", addr);
    axum::serve(listener, app).await
}

pub async fn search_plugins(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<Plugin>> {
    if params.q.is_empty() {
        return Json(Vec::new());
    }
    let catalog = state.catalog.clone();
    let term = params.q;
    let result = tokio::task::spawn_blocking(move || catalog.search_plugins(&term)).await;
    match result {
        Ok(Ok(plugins)) => Json(plugins),
        Ok(Err(e)) => {
            error!("plugin search failed: {e}");
            Json(Vec::new())
        }
        Err(e) => {
            error!("plugin search task panicked: {e}");
            Json(Vec::new())
        }
    }
}

pub async fn first_preset(State(state): State<AppState>) -> Json<Option<Preset>> {
    let catalog = state.catalog.clone();
    let result = tokio::task::spawn_blocking(move || catalog.first_preset()).await;
    match result {
        Ok(Ok(preset)) => Json(preset),
        Ok(Err(e)) => {
            error!("preset lookup failed: {e}");
            Json(None)
        }
        Err(e) => {
            error!("preset lookup task panicked: {e}");
            Json(None)
        }
    }
}
