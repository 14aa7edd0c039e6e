use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::metrics;
use crate::query::HouseQuery;
use crate::shaper;

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Hello World!" }))
        .route("/api/houses", get(houses))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn houses(State(state): State<AppState>, Query(q): Query<HouseQuery>) -> Response {
    let filter = q.filter_spec();
    let shape = q.shape_spec();
    debug!(?filter, ?shape, "houses query");

    let matches = filter.filter(state.dataset.listings());
    let resp = shaper::shape(matches, &shape);

    if let Some(cap) = resp.applied_zoom_limit {
        info!(
            zoom_level = ?resp.zoom_level,
            applied_limit = cap,
            results = resp.total_matches,
            "zoom limit applied"
        );
    }
    metrics::record_houses_request(resp.total_matches);

    // Serialized here: the envelope borrows from the shared dataset.
    Json(resp).into_response()
}
