//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log message.
///
/// Levels are ordered by rank and filtering is a plain `>=` comparison against
/// the logger's threshold. `System` is reserved for the logger's own lifecycle
/// notices; its rank is above every user level so those notices pass any
/// threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Debug = 0,
    #[default]
    Info = 1,
    Warn = 2,
    Error = 3,
    System = 100,
}

impl LogLevel {
    /// All levels a caller may log at or filter by, lowest first.
    pub const USER_LEVELS: [LogLevel; 4] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::System => "LOGSYS",
        }
    }

    /// Numeric rank used for ordering.
    #[inline]
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Whether callers may log at this level (everything except `System`).
    #[inline]
    pub fn is_user_level(&self) -> bool {
        !matches!(self, LogLevel::System)
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error | LogLevel::System => Red,
        }
    }

    /// SGR foreground code for this level (34, 32, 33 or 31).
    pub fn ansi_code(&self) -> u8 {
        self.color_code().to_fg_str().parse().unwrap_or(0)
    }

    /// Bold, colored label: `\x1b[1;<code>m<LABEL>\x1b[0m`.
    ///
    /// Always emits the escape codes; unlike `colored::Colorize` it does not
    /// look at the terminal, since the line format is fixed.
    pub fn colored_label(&self) -> String {
        format!(
            "\x1b[1;{}m{}\x1b[0m",
            self.color_code().to_fg_str(),
            self.to_str()
        )
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Parses a user level. `LOGSYS` is reserved and rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "LOGSYS" | "SYSTEM" => Err(format!("Log level '{}' is reserved", s)),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
