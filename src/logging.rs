//! Structured logging for awsping
//!
//! Every line goes to stderr so stdout carries nothing but the ranking
//! table. Entries carry structured fields, a session ID shared by all
//! loggers from one [`LoggerFactory`], and the correlation ID of the
//! operation in progress.

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::probe::ProbeOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Severity of a log entry, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// ANSI escape used for the level tag on a colour console
    fn ansi(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Line format for log output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    /// Timestamp, level, logger, message, correlation and fields
    Console,
    /// One JSON object per line
    Json,
    /// Time, level initial, logger and message only
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "console" => Ok(LogFormat::Console),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(AppError::parse(format!("Invalid log format: {}", s))),
        }
    }
}

/// One structured log record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Name of the emitting logger
    pub logger: String,
    pub correlation_id: Option<String>,
    pub fields: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Default)]
struct LogContext {
    session_id: Option<String>,
    current_correlation_id: Option<String>,
}

/// Named logger; clones share the session and correlation context
#[derive(Clone)]
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    format: LogFormat,
    name: String,
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    /// Console logger at WARN
    pub fn new(name: String) -> Self {
        Self::build(name, LogLevel::Warn, false, LogFormat::Console)
    }

    /// Logger honouring the configured level, format and colour
    pub fn with_config(name: String, config: &Config) -> Self {
        Self::build(name, config.log_level, config.enable_color, config.log_format)
    }

    fn build(name: String, min_level: LogLevel, use_color: bool, format: LogFormat) -> Self {
        Self {
            min_level,
            use_color,
            format,
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    pub async fn set_session_id(&self, session_id: String) {
        self.context.write().await.session_id = Some(session_id);
    }

    /// Open an operation; entries logged until it ends carry its ID
    pub async fn start_operation(&self, operation: &str) -> String {
        let id = Uuid::new_v4().to_string();
        self.context.write().await.current_correlation_id = Some(id.clone());

        self.debug(&format!("Started operation: {}", operation))
            .correlation_id(&id)
            .field("operation", operation)
            .log()
            .await;
        id
    }

    pub async fn end_operation(&self, id: &str, operation: &str, success: bool) {
        self.debug(&format!("Completed operation: {} (success: {})", operation, success))
            .correlation_id(id)
            .field("operation", operation)
            .field("success", success)
            .log()
            .await;

        let mut context = self.context.write().await;
        if context.current_correlation_id.as_deref() == Some(id) {
            context.current_correlation_id = None;
        }
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, LogLevel::Info, message)
    }

    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    async fn write_entry(&self, mut entry: LogEntry) {
        if !self.would_log(entry.level) {
            return;
        }

        {
            let context = self.context.read().await;
            if let Some(session_id) = &context.session_id {
                entry
                    .fields
                    .insert("session_id".to_string(), session_id.clone().into());
            }
            if entry.correlation_id.is_none() {
                entry.correlation_id = context.current_correlation_id.clone();
            }
        }

        let _ = writeln!(io::stderr(), "{}", self.format_entry(&entry));
    }

    /// Render an entry in the configured format
    pub fn format_entry(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Console => self.console_line(entry),
            LogFormat::Json => serde_json::to_string(entry)
                .unwrap_or_else(|e| format!("{{\"serialization_error\": \"{}\"}}", e)),
            LogFormat::Compact => format!(
                "{} {} {}: {}",
                entry.timestamp.format("%H:%M:%S"),
                &entry.level.as_str()[..1],
                entry.logger,
                entry.message
            ),
        }
    }

    fn console_line(&self, entry: &LogEntry) -> String {
        let level = if self.use_color {
            format!("{}{:>5}\x1b[0m", entry.level.ansi(), entry.level.as_str())
        } else {
            format!("{:>5}", entry.level.as_str())
        };

        let mut line = format!(
            "{} {} [{}] {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            level,
            entry.logger,
            entry.message
        );

        if let Some(id) = &entry.correlation_id {
            line.push_str(&format!(" [{}]", id.get(..8).unwrap_or(id)));
        }

        if !entry.fields.is_empty() {
            let pairs: Vec<String> = entry
                .fields
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            line.push_str(&format!(" {{{}}}", pairs.join(", ")));
        }

        line
    }
}

/// Accumulates fields for one entry; nothing is written until [`log`](Self::log)
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: &str) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message: message.to_string(),
                logger: logger.name.clone(),
                correlation_id: None,
                fields: BTreeMap::new(),
            },
        }
    }

    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    /// Attach a field; values that fail to serialize are skipped
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), value);
        }
        self
    }

    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error", error.to_string())
    }

    pub fn entry(&self) -> &LogEntry {
        &self.entry
    }

    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Logger for probe and round events
#[derive(Clone)]
pub struct ProbeLogger {
    logger: Logger,
}

impl ProbeLogger {
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("PROBE".to_string(), config),
        }
    }

    pub fn from_logger(logger: Logger) -> Self {
        Self { logger }
    }

    /// Log one probe. Failures are DEBUG only; they are data, not warnings.
    pub async fn log_probe(&self, code: &str, url: &str, outcome: &ProbeOutcome) {
        let elapsed_ms = outcome.elapsed_ms();
        let message = match &outcome.error {
            None => format!("GET {} -> ok in {:.1}ms", url, elapsed_ms),
            Some(_) => format!("GET {} -> FAILED after {:.1}ms", url, elapsed_ms),
        };

        let mut builder = self
            .logger
            .debug(&message)
            .field("region", code)
            .field("elapsed_ms", elapsed_ms)
            .field("success", outcome.is_success());

        if let Some(error) = &outcome.error {
            builder = builder.error_info(error);
        }

        builder.log().await;
    }

    /// Log a response body that could not be drained. The sample stands.
    pub async fn log_body_discarded(&self, code: &str, error: &AppError) {
        self.logger
            .debug(&format!("Discarded unreadable response body from {}", code))
            .field("region", code)
            .error_info(error)
            .log()
            .await;
    }

    pub async fn log_round(&self, round: u32, total_rounds: u32, regions: usize, elapsed_ms: f64) {
        self.logger
            .debug(&format!("Round {}/{} complete", round, total_rounds))
            .field("round", round)
            .field("regions", regions)
            .field("elapsed_ms", elapsed_ms)
            .log()
            .await;
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

/// Hands out loggers that share one session ID
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    pub async fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name.to_string(), &self.config);
        logger.set_session_id(self.session_id.clone()).await;
        logger
    }

    pub async fn create_probe_logger(&self) -> ProbeLogger {
        ProbeLogger::from_logger(self.create_logger("PROBE").await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn configured(level: LogLevel, format: LogFormat) -> Config {
        Config {
            log_level: level,
            log_format: format,
            enable_color: false,
            ..Config::default()
        }
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(" info ".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_would_log_follows_config() {
        let logger = Logger::new("TEST".to_string());
        assert!(!logger.would_log(LogLevel::Debug));
        assert!(logger.would_log(LogLevel::Warn));

        let logger = Logger::with_config(
            "TEST".to_string(),
            &configured(LogLevel::Trace, LogFormat::Console),
        );
        assert!(logger.would_log(LogLevel::Trace));
    }

    #[test]
    fn test_console_format() {
        let logger = Logger::new("NET".to_string());
        let builder = logger
            .info("probe finished")
            .correlation_id("0123456789abcdef")
            .field("region", "us-east-1");

        let line = logger.format_entry(builder.entry());
        assert!(line.contains(" INFO [NET] probe finished [01234567]"));
        assert!(line.contains("region=\"us-east-1\""));
    }

    #[test]
    fn test_json_format_keeps_fields() {
        let logger = Logger::with_config(
            "NET".to_string(),
            &configured(LogLevel::Debug, LogFormat::Json),
        );
        let builder = logger.info("slow").field("elapsed_ms", 12.5);

        let line = logger.format_entry(builder.entry());
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "Info");
        assert_eq!(value["fields"]["elapsed_ms"], 12.5);
    }

    #[test]
    fn test_compact_format() {
        let logger = Logger::with_config(
            "RUN".to_string(),
            &configured(LogLevel::Debug, LogFormat::Compact),
        );
        let builder = logger.debug("round done");

        let line = logger.format_entry(builder.entry());
        assert!(line.ends_with(" D RUN: round done"));
    }

    #[test]
    fn test_error_info_fields() {
        let logger = Logger::new("PROBE".to_string());
        let builder = logger
            .debug("failed")
            .error_info(&AppError::network("connection refused"));

        let fields = &builder.entry().fields;
        assert_eq!(fields["error_category"], "NETWORK");
        assert_eq!(fields["error"], "Network error: connection refused");
    }

    #[tokio::test]
    async fn test_operation_correlation() {
        let logger = Logger::new("RUN".to_string());
        let id = logger.start_operation("rank").await;
        assert_eq!(id.len(), 36);
        assert_eq!(
            logger.context.read().await.current_correlation_id.as_deref(),
            Some(id.as_str())
        );

        logger.end_operation(&id, "rank", true).await;
        assert!(logger.context.read().await.current_correlation_id.is_none());
    }

    #[tokio::test]
    async fn test_factory_shares_session_id() {
        let factory = LoggerFactory::new(Config::default());
        let a = factory.create_logger("A").await;
        let b = factory.create_probe_logger().await;

        let session_a = a.context.read().await.session_id.clone();
        let session_b = b.logger().context.read().await.session_id.clone();
        assert!(session_a.is_some());
        assert_eq!(session_a, session_b);
    }

    #[test]
    fn test_probe_logger_is_silent_at_default_level() {
        let logger = ProbeLogger::new(&Config::default());
        assert!(!logger.logger().would_log(LogLevel::Debug));

        let outcome = ProbeOutcome::failure(Duration::from_millis(3), AppError::network("refused"));
        tokio_test::block_on(logger.log_probe("us-east-1", "http://x", &outcome));
        tokio_test::block_on(
            logger.log_body_discarded("us-east-1", &AppError::http_request("body truncated")),
        );
    }
}
