//! Output formatting and display
//!
//! The ranking table goes to stdout; everything else is a log line on
//! stderr.

mod colored;
mod formatter;

pub use self::colored::{ColoredFormatter, PerformanceLevel};
pub use self::formatter::{format_latency, FormattingOptions, OutputFormatter, PlainFormatter};

use crate::{error::Result, models::RegionSet};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support
    pub fn create_formatter(enable_color: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            ..FormattingOptions::default()
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }
}

/// Renders ranked regions with the chosen formatter
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
}

impl OutputCoordinator {
    pub fn new(formatter: Box<dyn OutputFormatter>) -> Self {
        Self { formatter }
    }

    /// The full ranking table
    pub fn display_ranking(&self, regions: &RegionSet) -> Result<String> {
        self.formatter.format_ranking(regions)
    }
}
