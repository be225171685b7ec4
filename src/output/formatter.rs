//! Core formatting trait and the plain text table
//!
//! The ranking table is three right/left/right aligned columns: a
//! zero-based index, the region name and the mean latency with two
//! decimals followed by `ms`.

use crate::{
    error::{AppError, Result},
    models::{Region, RegionSet},
};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Column header line
    fn format_header(&self) -> Result<String>;

    /// One table row for the region at `index` in ranked order
    fn format_row(&self, index: usize, region: &Region) -> Result<String>;

    /// Header followed by one row per region, newline terminated
    fn format_ranking(&self, regions: &RegionSet) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "{}", self.format_header()?)
            .map_err(|e| AppError::io(format!("Failed to format ranking: {}", e)))?;

        for (index, region) in regions.iter().enumerate() {
            writeln!(output, "{}", self.format_row(index, region)?)
                .map_err(|e| AppError::io(format!("Failed to format ranking: {}", e)))?;
        }

        Ok(output)
    }
}

/// Column layout of the ranking table
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Width of the right-aligned index column
    pub index_width: usize,
    /// Width of the left-aligned region name column
    pub name_width: usize,
    /// Width of the right-aligned latency column
    pub latency_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: false,
            index_width: 5,
            name_width: 30,
            latency_width: 20,
        }
    }
}

impl FormattingOptions {
    /// Lay out the three cells; `latency` must already be padded if it
    /// carries escape codes
    pub(crate) fn row(&self, index: &str, name: &str, latency: &str) -> String {
        format!(
            "{:>iw$} {:<nw$} {:>lw$}",
            index,
            name,
            latency,
            iw = self.index_width,
            nw = self.name_width,
            lw = self.latency_width,
        )
    }

    pub(crate) fn header(&self) -> String {
        self.row("", "Region", "Latency")
    }
}

/// Mean latency cell text, e.g. `42.00 ms`
pub fn format_latency(mean_ms: f64) -> String {
    format!("{:.2} ms", mean_ms)
}

/// Plain text formatter
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormattingOptions {
        &self.options
    }
}

impl Default for PlainFormatter {
    fn default() -> Self {
        Self::new(FormattingOptions::default())
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self) -> Result<String> {
        Ok(self.options.header())
    }

    fn format_row(&self, index: usize, region: &Region) -> Result<String> {
        Ok(self.options.row(
            &index.to_string(),
            &region.name,
            &format_latency(region.mean_latency_ms()),
        ))
    }
}
