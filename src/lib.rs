//! # Queued Logger
//!
//! An in-process asynchronous log pipeline. Callers submit leveled messages;
//! a single background thread formats them and writes them to one sink.
//!
//! ## Features
//!
//! - **Bounded queue**: producers block when it is full instead of dropping
//! - **Ordered delivery**: the sink sees messages in enqueue order
//! - **Synchronous close**: `close()` returns only after the queue is drained
//! - **Signal shutdown**: termination signals close registered loggers before exit
//! - **Call-site capture**: every line carries the `file:line` of the logging call

pub mod core;
pub mod macros;
pub mod signal;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, LoggerState,
        Result, UnstartedLogger,
    };
    pub use crate::sinks::{ConsoleSink, FileSink, MemorySink, Sink};
}

pub use crate::core::{
    format_line, CallSite, Enqueued, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError,
    LoggerMetrics, LoggerState, Message, MessageQueue, Result, UnstartedLogger, WeakLogger,
    DEFAULT_QUEUE_CAPACITY, TIMESTAMP_FORMAT,
};
pub use crate::signal::ShutdownSupervisor;
pub use crate::sinks::{BoxedSink, ConsoleSink, FileSink, MemorySink, NetworkSink, Sink};
