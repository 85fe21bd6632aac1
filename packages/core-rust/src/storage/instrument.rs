//! Per-call instrumentation and deadline for store operations.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{info_span, Instrument};

use crate::error::StoreError;

pub const OUTCOME_SUCCESS: &str = "success";
pub const OUTCOME_FAILURE: &str = "failure";

const OPERATIONS_TOTAL: &str = "store_operations_total";
const OPERATION_DURATION: &str = "store_operation_duration_seconds";

/// Identifies one store call for spans and metric labels.
#[derive(Debug, Clone, Copy)]
pub struct StoreCall {
    /// Backend label, e.g. `mongodb` or `redis`.
    pub store: &'static str,
    /// Operation label, e.g. `list`, `get`, `put`, `delete`.
    pub operation: &'static str,
    /// Upper bound on the call; expiry yields [`StoreError::Timeout`].
    pub timeout: Duration,
}

/// Runs `fut` under a `store` span with the call's deadline applied.
///
/// Records `store_operations_total` and `store_operation_duration_seconds`
/// labelled with `store`, `operation` and `outcome`.
///
/// # Errors
///
/// Returns the inner error unchanged, or [`StoreError::Timeout`] if the
/// deadline elapses first. The inner future is dropped on timeout.
pub async fn observe<T, F>(call: StoreCall, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    let span = info_span!(
        "store",
        store = call.store,
        operation = call.operation,
        duration_ms = tracing::field::Empty,
        outcome = tracing::field::Empty,
    );

    async move {
        let start = Instant::now();
        let result = match tokio::time::timeout(call.timeout, fut).await {
            Ok(result) => result,
            Err(_elapsed) => Err(StoreError::Timeout {
                operation: call.operation,
                timeout_ms: millis(call.timeout),
            }),
        };
        let elapsed = start.elapsed();

        let outcome = if result.is_ok() {
            OUTCOME_SUCCESS
        } else {
            OUTCOME_FAILURE
        };

        let duration_ms = millis(elapsed);
        let span = tracing::Span::current();
        span.record("duration_ms", duration_ms);
        span.record("outcome", outcome);

        if let Err(err) = &result {
            tracing::debug!(error = %err, "store call failed");
        }

        let labels = [
            ("store", call.store),
            ("operation", call.operation),
            ("outcome", outcome),
        ];
        metrics::counter!(OPERATIONS_TOTAL, &labels).increment(1);
        metrics::histogram!(OPERATION_DURATION, &labels).record(elapsed.as_secs_f64());

        result
    }
    .instrument(span)
    .await
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::metrics::install_recorder;

    fn call(operation: &'static str, timeout: Duration) -> StoreCall {
        StoreCall {
            store: "instrument-test",
            operation,
            timeout,
        }
    }

    #[tokio::test]
    async fn passes_through_success() {
        let value = observe(call("get", Duration::from_secs(1)), async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn passes_through_backend_error() {
        let err = observe::<(), _>(call("put", Duration::from_secs(1)), async {
            Err(StoreError::backend("put", "READONLY"))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::Backend { operation: "put", .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_call_times_out() {
        let err = observe(call("delete", Duration::from_millis(50)), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Timeout {
                operation: "delete",
                timeout_ms: 50
            }
        ));
    }

    #[tokio::test]
    async fn records_outcome_labels() {
        let handle = install_recorder().unwrap();

        let _ = observe(call("list", Duration::from_secs(1)), async { Ok(()) }).await;
        let _ = observe::<(), _>(call("list", Duration::from_secs(1)), async {
            Err(StoreError::backend("list", "boom"))
        })
        .await;

        let rendered = handle.render();
        assert!(rendered.contains("store_operations_total"));
        assert!(rendered.contains(r#"store="instrument-test""#));
        assert!(rendered.contains(r#"outcome="success""#));
        assert!(rendered.contains(r#"outcome="failure""#));
    }
}
