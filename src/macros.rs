//! `format!`-style shorthands for the logger's level methods.
//!
//! Each macro formats its arguments and hands the resulting `String` to the
//! matching [`Logger`](crate::Logger) method. Because those methods are
//! `#[track_caller]`, the recorded call site is the line of the macro
//! invocation.
//!
//! ```
//! use queued_logger::prelude::*;
//! use queued_logger::{info, warn};
//!
//! let logger = Logger::builder().sink(MemorySink::new()).build()?;
//!
//! info!(logger, "cache warmed");
//! let misses = 3;
//! warn!(logger, "{} cache misses during warmup", misses);
//!
//! logger.close()?;
//! # Ok::<(), LoggerError>(())
//! ```

/// Format and log at an explicit level.
///
/// ```
/// # use queued_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build()?;
/// use queued_logger::log;
/// log!(logger, LogLevel::Info, "job queued");
/// log!(logger, LogLevel::Error, "job {} exited with status {}", 17, 2);
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Format and log at `Debug`.
///
/// ```
/// # use queued_logger::prelude::*;
/// # let logger = Logger::builder().level(LogLevel::Debug).sink(MemorySink::new()).build()?;
/// use queued_logger::debug;
/// debug!(logger, "retry budget: {}", 10);
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Format and log at `Info`.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Format and log at `Warn`.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Format and log at `Error`.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}
