use anyhow::Result;
use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

// A process can only hold one global recorder.
static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (once per process) and describe our series.
    pub fn init() -> Result<Self> {
        let handle = HANDLE.get_or_try_init(|| -> Result<PrometheusHandle> {
            let handle = PrometheusBuilder::new().install_recorder()?;
            describe_counter!("houses_requests_total", "Requests served by /api/houses.");
            describe_histogram!(
                "houses_matches",
                "Matching listings per request, after the zoom cap."
            );
            describe_gauge!("houses_dataset_listings", "Listings loaded at startup.");
            Ok(handle)
        })?;
        Ok(Self {
            handle: handle.clone(),
        })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

pub fn record_dataset_size(n: usize) {
    gauge!("houses_dataset_listings").set(n as f64);
}

pub fn record_houses_request(total_matches: usize) {
    counter!("houses_requests_total").increment(1);
    histogram!("houses_matches").record(total_matches as f64);
}
