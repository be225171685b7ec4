//! awsping
//!
//! Measures round-trip HTTP latency to AWS regional endpoints, repeats the
//! measurement a configurable number of times, and ranks the regions from
//! lowest to highest mean latency.

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod stats;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use executor::{ExecutionConfig, ExecutionSummary, LatencyCoordinator};
pub use models::{Config, Region, RegionSet};
pub use output::{OutputFormatter, OutputFormatterFactory};
pub use probe::{HttpProbe, ProbeOutcome, RegionProbe};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Product name sent in the User-Agent header
pub const PRODUCT_NAME: &str = "AwsPing";

/// Project URL sent in the User-Agent header
pub const PROJECT_URL: &str = env!("CARGO_PKG_HOMEPAGE");

/// Report panics with a pointer to the issue tracker.
///
/// The hook only prints. A panic inside a probe task unwinds into its
/// `JoinHandle`, and the run reports it as an internal error.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!("Please report this issue at: {}/issues", PROJECT_URL);
    }));
}

/// Default configuration values
pub mod defaults {
    pub const DEFAULT_REPEATS: u32 = 1;
    pub const MAX_TIMEOUT_SECONDS: u64 = 300;
    pub const DEFAULT_ENDPOINT_TEMPLATE: &str = "http://dynamodb.{code}.amazonaws.com/ping";
    pub const CACHE_BUSTER_LEN: usize = 13;

    /// Check if the terminal supports color output
    pub fn supports_color() -> bool {
        if let Ok(term) = std::env::var("TERM") {
            if term == "dumb" {
                return false;
            }
        }

        if std::env::var("NO_COLOR").is_ok() {
            return false;
        }

        if std::env::var("FORCE_COLOR").is_ok() {
            return true;
        }

        use std::io::IsTerminal;
        std::io::stdout().is_terminal()
    }
}
