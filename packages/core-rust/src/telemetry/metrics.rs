//! Prometheus recorder installation.
//!
//! The `metrics` facade has a single process-wide recorder. [`install_recorder`]
//! installs it on first call and hands out clones of the same render handle
//! afterwards, so bootstrap code and tests can both call it.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use parking_lot::Mutex;

/// Buckets (seconds) for request and store-call duration histograms.
pub const DURATION_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

static HANDLE: Mutex<Option<PrometheusHandle>> = parking_lot::const_mutex(None);

/// Installs the global Prometheus recorder, or returns the already-installed handle.
///
/// # Errors
///
/// Returns [`BuildError`] if the buckets are invalid or another recorder was
/// installed outside this function.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let mut slot = HANDLE.lock();
    if let Some(handle) = slot.as_ref() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new()
        .set_buckets(DURATION_BUCKETS)?
        .install_recorder()?;
    *slot = Some(handle.clone());
    Ok(handle)
}
