// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod dataset;
pub mod filter;
pub mod metrics;
pub mod price;
pub mod query;
pub mod shaper;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::config::ServiceConfig;
pub use crate::dataset::{Dataset, Listing};

use anyhow::Result;
use axum::Router;

/// Build the router around an already loaded dataset.
///
/// `debug_routes` additionally mounts `/metrics` (installing the Prometheus
/// recorder on first use).
pub fn router_with(dataset: Dataset, debug_routes: bool) -> Result<Router> {
    let size = dataset.len();
    let mut router = create_router(AppState::new(dataset));

    if debug_routes {
        let m = metrics::Metrics::init()?;
        router = router.merge(m.router());
    }
    metrics::record_dataset_size(size);
    Ok(router)
}

/// Load the dataset named by `config` and build the full application router.
pub fn app(config: &ServiceConfig) -> Result<Router> {
    let dataset = Dataset::load_from_file(&config.dataset_path, config.strict_dataset)?;
    router_with(dataset, config.debug_routes)
}
