//! Latency statistics for probed regions

use crate::models::Region;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Arithmetic mean of `samples` in milliseconds.
///
/// Returns NaN for an empty slice.
pub fn mean_ms(samples: &[Duration]) -> f64 {
    if samples.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = samples.iter().map(|d| d.as_secs_f64() * 1000.0).sum();
    sum / samples.len() as f64
}

/// Summary of one region's samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyStatistics {
    /// Mean latency in milliseconds (the ranking key)
    pub mean_ms: f64,
    /// Fastest sample in milliseconds
    pub min_ms: f64,
    /// Slowest sample in milliseconds
    pub max_ms: f64,
    /// Number of samples
    pub samples: usize,
    /// Number of samples taken from failed probes
    pub failures: u32,
}

impl LatencyStatistics {
    /// Summarize a region's recorded samples
    pub fn from_region(region: &Region) -> Self {
        let millis = region
            .latencies()
            .iter()
            .map(|d| d.as_secs_f64() * 1000.0);

        let (min_ms, max_ms) = millis.fold((f64::NAN, f64::NAN), |(min, max), ms| {
            (min.min(ms), max.max(ms))
        });

        Self {
            mean_ms: region.mean_latency_ms(),
            min_ms,
            max_ms,
            samples: region.sample_count(),
            failures: region.failure_count(),
        }
    }
}
