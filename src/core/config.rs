//! Logger configuration and builder

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::logger::{Logger, UnstartedLogger};
use crate::sinks::{BoxedSink, Sink};
use serde::{Deserialize, Serialize};

/// Default number of messages the queue can buffer.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Construction parameters for a logger.
///
/// The sink is not part of the serializable configuration; pass it to the
/// builder.
///
/// # Example
///
/// ```
/// use queued_logger::{LogLevel, LoggerConfig};
///
/// let config = LoggerConfig::from_json(r#"{ "level": "Warn", "queue_capacity": 64 }"#)?;
/// assert_eq!(config.level, LogLevel::Warn);
/// assert_eq!(config.queue_capacity, 64);
/// assert!(!config.handle_signals);
/// # Ok::<(), queued_logger::LoggerError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum level a message needs to be enqueued
    pub level: LogLevel,
    /// Fixed size of the message queue
    pub queue_capacity: usize,
    /// Close the logger on termination signals and exit the process
    pub handle_signals: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            handle_signals: false,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.level.is_user_level() {
            return Err(LoggerError::config(
                "LoggerConfig",
                format!("level {} is reserved", self.level),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "queue_capacity must be a positive integer",
            ));
        }
        Ok(())
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use queued_logger::prelude::*;
/// use queued_logger::sinks::MemorySink;
///
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .queue_capacity(256)
///     .sink(MemorySink::new())
///     .build()?;
///
/// logger.debug("ready");
/// logger.close()?;
/// # Ok::<(), LoggerError>(())
/// ```
#[derive(Default)]
pub struct LoggerBuilder {
    config: LoggerConfig,
    sink: Option<BoxedSink>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the threshold
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    /// Set the queue capacity
    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Set the sink. Without one the logger writes to stdout.
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Set an already boxed sink, or clear it with `None`.
    #[must_use = "builder methods return a new value"]
    pub fn boxed_sink(mut self, sink: Option<BoxedSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Register the logger with the process signal supervisor when it starts.
    #[must_use = "builder methods return a new value"]
    pub fn handle_signals(mut self, enable: bool) -> Self {
        self.config.handle_signals = enable;
        self
    }

    /// Replace all configuration values at once.
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    /// Build and start the logger
    #[track_caller]
    pub fn build(self) -> Result<Logger> {
        self.build_unstarted()?.start()
    }

    /// Build the logger without starting its writer thread
    pub fn build_unstarted(self) -> Result<UnstartedLogger> {
        UnstartedLogger::from_config(&self.config, self.sink)
    }
}

impl std::fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("config", &self.config)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
