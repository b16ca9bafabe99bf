//! Signal-triggered shutdown
//!
//! Loggers know nothing about signals. A [`ShutdownSupervisor`] keeps weak
//! handles to registered loggers and closes them on request; the process-wide
//! instance additionally owns a single listener thread that does so when a
//! termination signal arrives, then exits the process with status 0.

use crate::core::{Logger, LoggerError, Result, WeakLogger};
use parking_lot::Mutex;
use std::sync::OnceLock;

/// Signals that trigger a graceful shutdown.
#[cfg(all(unix, feature = "signals"))]
pub const SHUTDOWN_SIGNALS: [std::ffi::c_int; 7] = {
    use signal_hook::consts::signal::*;
    [SIGHUP, SIGINT, SIGTERM, SIGQUIT, SIGUSR1, SIGUSR2, SIGTSTP]
};

#[cfg(all(unix, feature = "signals"))]
const LISTENER_THREAD_NAME: &str = "queued-logger-signals";

static GLOBAL: OnceLock<ShutdownSupervisor> = OnceLock::new();

/// Registry of loggers to close on shutdown.
#[derive(Default)]
pub struct ShutdownSupervisor {
    loggers: Mutex<Vec<WeakLogger>>,
    listening: Mutex<bool>,
}

impl ShutdownSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide supervisor used by loggers built with signal handling.
    pub fn global() -> &'static ShutdownSupervisor {
        GLOBAL.get_or_init(ShutdownSupervisor::new)
    }

    /// Track `logger` without keeping it alive.
    pub fn register(&self, logger: &Logger) {
        let mut loggers = self.loggers.lock();
        loggers.retain(WeakLogger::is_alive);
        loggers.push(logger.downgrade());
    }

    /// Number of registered loggers that are still alive.
    pub fn registered(&self) -> usize {
        self.loggers.lock().iter().filter(|l| l.is_alive()).count()
    }

    /// Close every live registered logger, emptying the registry.
    ///
    /// Each close waits for that logger's drain. Returns how many loggers
    /// this call actually closed; ones that were already closed are skipped.
    pub fn close_all(&self) -> usize {
        let loggers = std::mem::take(&mut *self.loggers.lock());

        loggers
            .iter()
            .filter_map(WeakLogger::upgrade)
            .filter(|logger| match logger.close() {
                Ok(()) => true,
                Err(LoggerError::AlreadyClosed) => false,
                Err(e) => {
                    eprintln!("[LOGGER ERROR] Failed to close logger on shutdown: {}", e);
                    false
                }
            })
            .count()
    }

    pub fn is_listening(&self) -> bool {
        *self.listening.lock()
    }

    /// Start the listener thread if it is not running yet.
    ///
    /// The thread runs for the life of the process. On the first shutdown
    /// signal it closes every registered logger and exits with status 0.
    #[cfg(all(unix, feature = "signals"))]
    pub fn listen(&'static self) -> Result<()> {
        use signal_hook::iterator::Signals;

        let mut listening = self.listening.lock();
        if *listening {
            return Ok(());
        }

        let mut signals = Signals::new(SHUTDOWN_SIGNALS)
            .map_err(|source| LoggerError::SignalRegistration { source })?;

        std::thread::Builder::new()
            .name(LISTENER_THREAD_NAME.to_string())
            .spawn(move || {
                if let Some(signal) = signals.forever().next() {
                    eprintln!(
                        "[LOGGER WARNING] Received signal {}, closing loggers before exit",
                        signal
                    );
                    self.close_all();
                    std::process::exit(0);
                }
            })?;

        *listening = true;
        Ok(())
    }

    /// Signal handling is unavailable on this target; nothing to start.
    #[cfg(not(all(unix, feature = "signals")))]
    pub fn listen(&'static self) -> Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for ShutdownSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownSupervisor")
            .field("registered", &self.registered())
            .field("listening", &self.is_listening())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use crate::sinks::MemorySink;

    fn logger(sink: &MemorySink) -> Logger {
        Logger::builder()
            .level(LogLevel::Debug)
            .queue_capacity(4)
            .sink(sink.clone())
            .build()
            .unwrap()
    }

    #[test]
    fn test_close_all_drains_registered_loggers() {
        let supervisor = ShutdownSupervisor::new();
        let first_sink = MemorySink::new();
        let second_sink = MemorySink::new();
        let first = logger(&first_sink);
        let second = logger(&second_sink);

        supervisor.register(&first);
        supervisor.register(&second);
        assert_eq!(supervisor.registered(), 2);

        first.info("pending in first");
        second.info("pending in second");

        assert_eq!(supervisor.close_all(), 2);
        assert!(first.is_closed() && second.is_closed());
        assert!(first_sink.contents().contains("pending in first"));
        let last = second_sink.lines().pop().unwrap();
        assert!(last.ends_with("Logger closed"));
        assert_eq!(supervisor.registered(), 0);
    }

    #[test]
    fn test_close_all_skips_closed_and_dropped() {
        let supervisor = ShutdownSupervisor::new();
        let sink = MemorySink::new();

        let closed = logger(&sink);
        supervisor.register(&closed);
        closed.close().unwrap();

        let dropped = logger(&sink);
        supervisor.register(&dropped);
        drop(dropped);

        assert_eq!(supervisor.close_all(), 0);
    }

    #[test]
    fn test_register_prunes_dead_loggers() {
        let supervisor = ShutdownSupervisor::new();
        let sink = MemorySink::new();

        supervisor.register(&logger(&sink));
        let alive = logger(&sink);
        supervisor.register(&alive);

        assert_eq!(supervisor.registered(), 1);
        assert_eq!(supervisor.loggers.lock().len(), 1);
    }

    #[cfg(all(unix, feature = "signals"))]
    #[test]
    fn test_shutdown_signal_set() {
        use signal_hook::consts::signal::*;
        assert!(SHUTDOWN_SIGNALS.contains(&SIGTERM));
        assert!(SHUTDOWN_SIGNALS.contains(&SIGTSTP));
        assert_eq!(SHUTDOWN_SIGNALS.len(), 7);
    }
}
