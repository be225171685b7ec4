//! Data models and structures for awsping

pub mod config;
pub mod region;

// Re-export main model types
pub use config::Config;
pub use region::{Region, RegionSet, AWS_REGIONS};
