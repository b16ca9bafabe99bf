//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration {
        component: String,
        message: String,
    },

    /// The queue no longer accepts messages
    #[error("Log queue is closed")]
    QueueClosed,

    /// `close()` was called on a logger that is already closed
    #[error("Logger already closed")]
    AlreadyClosed,

    /// The background writer panicked instead of finishing its drain
    #[error("Logger worker thread panicked: {0}")]
    WorkerPanicked(String),

    /// Installing the process signal listener failed
    #[error("Failed to register signal handlers: {source}")]
    SignalRegistration {
        #[source]
        source: std::io::Error,
    },
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub(crate) fn worker_panicked(payload: Box<dyn std::any::Any + Send>) -> Self {
        LoggerError::WorkerPanicked(panic_message(payload.as_ref()))
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
