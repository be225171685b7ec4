//! Colored formatter: same layout as the plain table, latency cell tinted
//! by performance level

use super::formatter::{format_latency, FormattingOptions, OutputFormatter};
use crate::{error::Result, models::Region};
use colored::*;

/// Performance level classification for color coding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceLevel {
    Excellent, // < 50ms
    Good,      // 50-100ms
    Fair,      // 100-300ms
    Poor,      // 300-1000ms
    VeryPoor,  // >= 1000ms, or no samples
}

impl PerformanceLevel {
    /// Classify a mean latency in milliseconds
    pub fn from_response_time(time_ms: f64) -> Self {
        if time_ms.is_nan() {
            Self::VeryPoor
        } else if time_ms < 50.0 {
            Self::Excellent
        } else if time_ms < 100.0 {
            Self::Good
        } else if time_ms < 300.0 {
            Self::Fair
        } else if time_ms < 1000.0 {
            Self::Poor
        } else {
            Self::VeryPoor
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Magenta,
            Self::VeryPoor => Color::Red,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    options: FormattingOptions,
}

impl ColoredFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self) -> Result<String> {
        Ok(self.bold(&self.options.header()).to_string())
    }

    fn format_row(&self, index: usize, region: &Region) -> Result<String> {
        let mean = region.mean_latency_ms();
        // Pad before coloring so escape codes do not count toward the width
        let padded = format!("{:>w$}", format_latency(mean), w = self.options.latency_width);
        let latency = self.colorize(&padded, PerformanceLevel::from_response_time(mean).color());

        Ok(format!(
            "{:>iw$} {:<nw$} {}",
            index,
            region.name,
            latency,
            iw = self.options.index_width,
            nw = self.options.name_width,
        ))
    }
}
