//! Region probes: one timed HTTP request per region per round


use crate::{
    error::{AppError, Result},
    logging::ProbeLogger,
    models::{Config, Region},
};
use async_trait::async_trait;
use rand::Rng;
use reqwest::{header::USER_AGENT, Client};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use url::Url;

const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Result of a single probe: the elapsed time is always present
#[derive(Debug)]
pub struct ProbeOutcome {
    pub elapsed: Duration,
    pub error: Option<AppError>,
}

impl ProbeOutcome {
    pub fn success(elapsed: Duration) -> Self {
        Self { elapsed, error: None }
    }

    pub fn failure(elapsed: Duration, error: AppError) -> Self {
        Self { elapsed, error: Some(error) }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// A single timed request against one region's endpoint.
///
/// Implementations never fail: transport errors are reported inside the
/// outcome together with the time spent before the failure.
#[async_trait]
pub trait RegionProbe: Send + Sync {
    async fn probe(&self, code: &str, cache_buster: &str) -> ProbeOutcome;
}

/// Run one probe for `region` and record the outcome on it
pub async fn check_latency<P>(probe: &P, region: &mut Region, cache_buster: &str)
where
    P: RegionProbe + ?Sized,
{
    let outcome = probe.probe(&region.code, cache_buster).await;
    region.record(outcome);
}

/// Random letters used as the `x` query parameter to defeat caches
pub fn random_token<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Identifying User-Agent, e.g. `AwsPing/0.1.0 (+https://github.com/ekalinin/awsping)`
pub fn user_agent() -> String {
    format!("{}/{} (+{})", crate::PRODUCT_NAME, crate::VERSION, crate::PROJECT_URL)
}

/// Probe issuing `GET <endpoint>?x=<token>` with reqwest
pub struct HttpProbe {
    client: Client,
    endpoint_template: String,
    user_agent: String,
    timeout: Option<Duration>,
    logger: ProbeLogger,
}

impl HttpProbe {
    /// Create a probe for the AWS DynamoDB ping endpoints
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_logger(config, ProbeLogger::new(config))
    }

    /// Create a probe that logs through `logger`
    pub fn with_logger(config: &Config, logger: ProbeLogger) -> Result<Self> {
        // No client-level timeout; a per-probe limit is applied around send()
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint_template: crate::defaults::DEFAULT_ENDPOINT_TEMPLATE.to_string(),
            user_agent: user_agent(),
            timeout: config.timeout(),
            logger,
        })
    }

    /// Replace the endpoint template; `{code}` is substituted with the region code
    pub fn with_endpoint<S: Into<String>>(mut self, template: S) -> Self {
        self.endpoint_template = template.into();
        self
    }

    /// Bound every probe by `limit`
    pub fn with_timeout(mut self, limit: Option<Duration>) -> Self {
        self.timeout = limit;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Build the ping URL for a region
    pub fn ping_url(&self, code: &str, cache_buster: &str) -> Result<Url> {
        let raw = self.endpoint_template.replace("{code}", code);
        let mut url = Url::parse(&raw)
            .map_err(|e| AppError::parse(format!("Invalid ping URL '{}': {}", raw, e)))?;
        url.query_pairs_mut().append_pair("x", cache_buster);
        Ok(url)
    }

    async fn send_timed(&self, code: &str, url: Url) -> ProbeOutcome {
        let request = self.client.get(url).header(USER_AGENT, &self.user_agent);

        let start = Instant::now();
        let result = match self.timeout {
            Some(limit) => match timeout(limit, request.send()).await {
                Ok(sent) => sent.map_err(AppError::from),
                Err(_) => Err(AppError::timeout(format!(
                    "Probe exceeded {:.1}s",
                    limit.as_secs_f64()
                ))),
            },
            None => request.send().await.map_err(AppError::from),
        };
        let elapsed = start.elapsed();

        match result {
            Ok(response) => {
                // Status is not inspected; drain the body so the connection is released.
                // The sample is already taken, so a failed drain is only logged.
                if let Err(e) = response.bytes().await {
                    self.logger.log_body_discarded(code, &AppError::from(e)).await;
                }
                ProbeOutcome::success(elapsed)
            }
            Err(e) => ProbeOutcome::failure(elapsed, e),
        }
    }
}

#[async_trait]
impl RegionProbe for HttpProbe {
    async fn probe(&self, code: &str, cache_buster: &str) -> ProbeOutcome {
        let url = match self.ping_url(code, cache_buster) {
            Ok(url) => url,
            Err(e) => return ProbeOutcome::failure(Duration::ZERO, e),
        };

        let url_text = url.to_string();
        let outcome = self.send_timed(code, url).await;
        self.logger.log_probe(code, &url_text, &outcome).await;
        outcome
    }
}
