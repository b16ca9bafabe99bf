//! Log message structure

use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::fmt;
use std::panic::Location;

/// Source location of a logging call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Location of the caller.
    ///
    /// Every public logging entry point is `#[track_caller]`, so the location
    /// propagates through the logger's wrappers and resolves to application
    /// code no matter which wrapper was used.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self {
            file: location.file(),
            line: location.line(),
        }
    }

    /// Placeholder used when no location is available.
    pub const fn unknown() -> Self {
        Self { file: "", line: 0 }
    }

    pub fn is_unknown(&self) -> bool {
        self.file.is_empty()
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// An immutable log record, created once per logging call and consumed by
/// the background writer.
#[derive(Debug, Clone)]
pub struct Message {
    level: LogLevel,
    text: String,
    call_site: CallSite,
    created_at: DateTime<Local>,
}

impl Message {
    #[track_caller]
    pub fn new(level: LogLevel, text: impl Into<String>) -> Self {
        Self::with_call_site(level, text, CallSite::caller())
    }

    pub fn with_call_site(level: LogLevel, text: impl Into<String>, call_site: CallSite) -> Self {
        Self {
            level,
            text: text.into(),
            call_site,
            created_at: Local::now(),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn call_site(&self) -> CallSite {
        self.call_site
    }

    pub fn file(&self) -> &'static str {
        self.call_site.file
    }

    pub fn line(&self) -> u32 {
        self.call_site.line
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }
}
