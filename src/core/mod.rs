//! Core logger types

pub mod config;
pub mod error;
pub mod format;
pub mod log_level;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod queue;

pub use config::{LoggerBuilder, LoggerConfig, DEFAULT_QUEUE_CAPACITY};
pub use error::{LoggerError, Result};
pub use format::{format_line, TIMESTAMP_FORMAT};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerState, UnstartedLogger, WeakLogger};
pub use message::{CallSite, Message};
pub use metrics::LoggerMetrics;
pub use queue::{Enqueued, MessageQueue};
