//! Round-based probe execution and ranking
//!
//! The coordinator runs `repeats` rounds. Each round spawns one task per
//! region; the region is moved into its task and handed back when the probe
//! finishes, so no two probes ever share a region and no lock is needed.
//! Awaiting every join handle of a round is the barrier: round k+1 is not
//! started until all regions of round k are back.

use crate::{
    error::Result,
    logging::{Logger, ProbeLogger},
    models::{Config, Region, RegionSet},
    probe::{check_latency, random_token, RegionProbe},
    stats::LatencyStatistics,
};
use futures::future::join_all;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

/// Execution settings for a ranking run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Number of probe rounds per region
    pub repeats: u32,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            repeats: crate::defaults::DEFAULT_REPEATS,
        }
    }
}

impl From<&Config> for ExecutionConfig {
    fn from(config: &Config) -> Self {
        Self {
            repeats: config.repeats,
        }
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionSummary {
    /// Rounds executed
    pub rounds: u32,
    /// Regions probed per round
    pub regions: usize,
    /// Total probes issued
    pub total_probes: u32,
    /// Probes that ended in a transport error
    pub failed_probes: u32,
    /// Wall-clock time for all rounds
    pub elapsed: Duration,
}

impl ExecutionSummary {
    /// Percentage of probes that completed without error
    pub fn success_rate(&self) -> f64 {
        if self.total_probes == 0 {
            return 0.0;
        }
        (self.total_probes - self.failed_probes) as f64 / self.total_probes as f64 * 100.0
    }
}

/// Fans out probes per round and ranks regions by mean latency
pub struct LatencyCoordinator<P: RegionProbe + 'static> {
    config: ExecutionConfig,
    probe: Arc<P>,
    rng: StdRng,
    logger: ProbeLogger,
}

impl<P: RegionProbe + 'static> LatencyCoordinator<P> {
    /// Create a coordinator with an entropy-seeded token source
    pub fn new(config: ExecutionConfig, probe: P) -> Self {
        Self {
            config,
            probe: Arc::new(probe),
            rng: StdRng::from_entropy(),
            logger: ProbeLogger::from_logger(Logger::new("RUN".to_string())),
        }
    }

    /// Use a specific random source for cache-busting tokens
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_logger(mut self, logger: ProbeLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Probe the built-in AWS catalogue
    pub async fn run_default(&mut self) -> Result<(RegionSet, ExecutionSummary)> {
        self.run(RegionSet::aws()).await
    }

    /// Probe every region `repeats` times and return them ranked
    pub async fn run(&mut self, regions: RegionSet) -> Result<(RegionSet, ExecutionSummary)> {
        let logger = self.logger.clone();
        let run_id = logger.logger().start_operation("rank regions").await;

        let started = Instant::now();
        let rounds = self.config.repeats;
        let region_count = regions.len();
        let mut regions = regions.into_vec();

        for round in 1..=rounds {
            let round_started = Instant::now();
            regions = match self.run_round(regions).await {
                Ok(regions) => regions,
                Err(e) => {
                    logger.logger().end_operation(&run_id, "rank regions", false).await;
                    return Err(e);
                }
            };

            logger
                .log_round(
                    round,
                    rounds,
                    region_count,
                    round_started.elapsed().as_secs_f64() * 1000.0,
                )
                .await;
        }

        let failed_probes = regions.iter().map(Region::failure_count).sum();
        let mut ranked = RegionSet::from(regions);
        ranked.rank();

        for region in &ranked {
            let stats = LatencyStatistics::from_region(region);
            logger
                .logger()
                .debug(&format!("{}: {:.2} ms", region.code, stats.mean_ms))
                .field("region", &region.code)
                .field("min_ms", stats.min_ms)
                .field("max_ms", stats.max_ms)
                .field("samples", stats.samples)
                .field("failures", stats.failures)
                .log()
                .await;
        }

        let summary = ExecutionSummary {
            rounds,
            regions: region_count,
            total_probes: rounds * region_count as u32,
            failed_probes,
            elapsed: started.elapsed(),
        };

        logger.logger().end_operation(&run_id, "rank regions", true).await;
        Ok((ranked, summary))
    }

    /// One round: every region probed in parallel, returned in input order
    async fn run_round(&mut self, regions: Vec<Region>) -> Result<Vec<Region>> {
        let handles: Vec<_> = regions
            .into_iter()
            .map(|mut region| {
                let token = random_token(&mut self.rng, crate::defaults::CACHE_BUSTER_LEN);
                let probe = Arc::clone(&self.probe);
                tokio::spawn(async move {
                    check_latency(probe.as_ref(), &mut region, &token).await;
                    region
                })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.map_err(Into::into))
            .collect()
    }
}
