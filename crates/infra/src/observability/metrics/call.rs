//! Counters and latency percentiles for gateway calls
//!
//! Every request is counted once with its outcome label: `success` or the
//! [`ApiError::label`] of the failure. Latencies go into a ring buffer of
//! the most recent samples for P50/P95 queries.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use punchclock_domain::ApiError;

use crate::observability::{MetricsError, MetricsResult};

/// Outcome label for a 2xx response.
pub const OUTCOME_SUCCESS: &str = "success";

const MAX_LATENCY_SAMPLES: usize = 1000;

/// Thread-safe gateway call statistics.
#[derive(Debug, Default)]
pub struct GatewayMetrics {
    total_requests: AtomicU64,
    outcomes: Mutex<BTreeMap<&'static str, u64>>,
    latencies_ms: Mutex<VecDeque<u64>>,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub outcomes: BTreeMap<&'static str, u64>,
}

impl MetricsSnapshot {
    pub fn count(&self, outcome: &str) -> u64 {
        self.outcomes.get(outcome).copied().unwrap_or(0)
    }
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished call.
    pub fn record(&self, outcome: Result<(), &ApiError>, latency: Duration) {
        self.total_requests.fetch_add(1, Ordering::SeqCst);

        let label = match outcome {
            Ok(()) => OUTCOME_SUCCESS,
            Err(err) => err.label(),
        };
        *recover(&self.outcomes, "outcomes").entry(label).or_insert(0) += 1;

        let ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        let mut samples = recover(&self.latencies_ms, "latencies_ms");
        samples.push_back(ms);
        if samples.len() > MAX_LATENCY_SAMPLES {
            samples.pop_front();
        }
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.total_requests(),
            outcomes: recover(&self.outcomes, "outcomes").clone(),
        }
    }

    /// Median latency in milliseconds.
    pub fn p50_latency_ms(&self) -> MetricsResult<u64> {
        self.percentile(0.50, "P50")
    }

    pub fn p95_latency_ms(&self) -> MetricsResult<u64> {
        self.percentile(0.95, "P95")
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn percentile(&self, percentile: f64, metric: &'static str) -> MetricsResult<u64> {
        let samples = recover(&self.latencies_ms, "latencies_ms");
        if samples.is_empty() {
            return Err(MetricsError::EmptyData { metric });
        }

        let mut sorted: Vec<u64> = samples.iter().copied().collect();
        drop(samples);
        sorted.sort_unstable();

        let index = ((sorted.len() as f64 * percentile) as usize).min(sorted.len() - 1);
        Ok(sorted[index])
    }
}

fn recover<'a, T>(mutex: &'a Mutex<T>, metric: &'static str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poison_err) => {
            tracing::warn!(metric, "Mutex poisoned in gateway metrics, recovering data");
            poison_err.into_inner()
        }
    }
}
