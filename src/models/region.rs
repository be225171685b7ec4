//! Region and region set data models

use crate::error::AppError;
use crate::probe::ProbeOutcome;
use crate::stats::mean_ms;
use std::cmp::Ordering;
use std::time::Duration;

/// The AWS regions probed by default, as `(display name, endpoint code)`
pub const AWS_REGIONS: &[(&str, &str)] = &[
    ("US-East (Virginia)", "us-east-1"),
    ("US-West (California)", "us-west-1"),
    ("US-West (Oregon)", "us-west-2"),
    ("Asia Pacific (Mumbai)", "ap-south-1"),
    ("Asia Pacific (Seoul)", "ap-northeast-2"),
    ("Asia Pacific (Singapore)", "ap-southeast-1"),
    ("Asia Pacific (Sydney)", "ap-southeast-2"),
    ("Asia Pacific (Tokyo)", "ap-northeast-1"),
    ("Europe (Ireland)", "eu-west-1"),
    ("Europe (Frankfurt)", "eu-central-1"),
    ("South America (São Paulo)", "sa-east-1"),
];

/// One cloud region being latency-tested, with every sample recorded so far
#[derive(Debug)]
pub struct Region {
    /// Human-readable region name
    pub name: String,

    /// Endpoint code templated into the ping URL
    pub code: String,

    latencies: Vec<Duration>,
    last_error: Option<AppError>,
    failures: u32,
}

impl Region {
    /// Create a region with no samples
    pub fn new<N: Into<String>, C: Into<String>>(name: N, code: C) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            latencies: Vec::new(),
            last_error: None,
            failures: 0,
        }
    }

    /// Record the outcome of one probe.
    ///
    /// The elapsed time is always appended, even for a failed probe. The
    /// stored error is replaced on every call, so a successful probe clears
    /// the previous round's error.
    pub fn record(&mut self, outcome: ProbeOutcome) {
        self.latencies.push(outcome.elapsed);
        if outcome.error.is_some() {
            self.failures += 1;
        }
        self.last_error = outcome.error;
    }

    /// Arithmetic mean of all samples in milliseconds, NaN when there are none
    pub fn mean_latency_ms(&self) -> f64 {
        mean_ms(&self.latencies)
    }

    /// Recorded round-trip durations in probe order
    pub fn latencies(&self) -> &[Duration] {
        &self.latencies
    }

    /// Number of recorded samples
    pub fn sample_count(&self) -> usize {
        self.latencies.len()
    }

    /// Number of probes that ended in an error
    pub fn failure_count(&self) -> u32 {
        self.failures
    }

    /// Error from the most recent probe, if it failed
    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }
}

/// Ordered collection of regions, reordered only by [`RegionSet::rank`]
#[derive(Debug, Default)]
pub struct RegionSet {
    regions: Vec<Region>,
}

impl RegionSet {
    /// The default AWS catalogue in declaration order
    pub fn aws() -> Self {
        AWS_REGIONS
            .iter()
            .map(|&(name, code)| Region::new(name, code))
            .collect::<Vec<_>>()
            .into()
    }

    /// Sort in place by mean latency, lowest first.
    ///
    /// Stable: regions with equal means keep their relative order. Regions
    /// without samples (NaN mean) sort last.
    pub fn rank(&mut self) {
        self.regions
            .sort_by(|a, b| compare_means(a.mean_latency_ms(), b.mean_latency_ms()));
    }

    /// Whether adjacent regions are non-decreasing in mean latency, with
    /// every NaN mean after every finite one
    pub fn is_ranked(&self) -> bool {
        self.regions.windows(2).all(|pair| {
            compare_means(pair[0].mean_latency_ms(), pair[1].mean_latency_ms()).is_le()
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Look up a region by endpoint code
    pub fn get(&self, code: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.code == code)
    }

    pub fn into_vec(self) -> Vec<Region> {
        self.regions
    }
}

/// Ranking order for mean latencies. NaN sorts after every number whatever
/// its sign bit; `total_cmp` alone would put a negative NaN first.
pub(crate) fn compare_means(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.total_cmp(&b),
    }
}

impl From<Vec<Region>> for RegionSet {
    fn from(regions: Vec<Region>) -> Self {
        Self { regions }
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}
