//! Main logger implementation

use super::{
    config::{LoggerBuilder, LoggerConfig},
    error::{panic_message, LoggerError, Result},
    format::format_line,
    log_level::LogLevel,
    message::{CallSite, Message},
    metrics::LoggerMetrics,
    queue::{Enqueued, MessageQueue},
};
use crate::signal::ShutdownSupervisor;
use crate::sinks::{BoxedSink, ConsoleSink, Sink};
use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::io::{self, Write};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};

const CONSUMER_THREAD_NAME: &str = "queued-logger-consumer";
const STARTED_MESSAGE: &str = "Logger started";
const CLOSED_MESSAGE: &str = "Logger closed";

/// Lifecycle of a logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerState {
    /// Built but not started; see [`UnstartedLogger`].
    Unstarted,
    /// Accepting messages; the background writer is running.
    Running,
    /// `close()` has been called. Further logging calls are no-ops.
    Closed,
}

/// State shared between producers and the writer thread.
struct Shared {
    threshold: RwLock<LogLevel>,
    sink: Mutex<BoxedSink>,
    queue: MessageQueue,
    closed: AtomicBool,
    metrics: LoggerMetrics,
}

impl Shared {
    fn new(level: LogLevel, capacity: usize, sink: Option<BoxedSink>) -> Result<Self> {
        validate_threshold(level)?;
        Ok(Self {
            threshold: RwLock::new(level),
            sink: Mutex::new(sink.unwrap_or_else(|| Box::new(ConsoleSink::stdout()))),
            queue: MessageQueue::new(capacity)?,
            closed: AtomicBool::new(false),
            metrics: LoggerMetrics::new(),
        })
    }

    fn level(&self) -> LogLevel {
        *self.threshold.read()
    }

    fn set_level(&self, level: LogLevel) -> Result<()> {
        validate_threshold(level)?;
        *self.threshold.write() = level;
        Ok(())
    }

    fn set_writer(&self, sink: BoxedSink) -> BoxedSink {
        let mut previous = std::mem::replace(&mut *self.sink.lock(), sink);
        if let Err(e) = previous.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush replaced sink: {}", e);
        }
        previous
    }

    /// Filter and enqueue one message on behalf of a producer.
    fn submit(&self, level: LogLevel, text: String, call_site: CallSite) {
        if self.closed.load(Ordering::Acquire) {
            self.metrics.record_discarded();
            return;
        }
        if level < self.level() {
            self.metrics.record_filtered();
            return;
        }

        let message = Message::with_call_site(level, text, call_site);
        match self.queue.push(message) {
            Ok(Enqueued::Immediately) => {
                self.metrics.record_enqueued();
            }
            Ok(Enqueued::AfterBlocking) => {
                self.metrics.record_block();
                self.metrics.record_enqueued();
            }
            Err(_) => {
                // Closed between the flag check and the push
                self.metrics.record_discarded();
            }
        }
    }

    fn write_message(&self, message: &Message) {
        let line = format_line(message);
        match guard_sink(|| self.sink.lock().write_all(line.as_bytes())) {
            Ok(()) => {
                self.metrics.record_written();
            }
            Err(e) => self.report_write_failure(&e),
        }
    }

    fn flush_sink(&self) {
        if let Err(e) = guard_sink(|| self.sink.lock().flush()) {
            eprintln!("[LOGGER ERROR] Sink flush failed: {}", e);
        }
    }

    fn report_write_failure(&self, err: &io::Error) {
        let previous = self.metrics.record_write_failure();

        // Alert on the first failure and periodically thereafter
        let lost = previous + 1;
        if previous == 0 || lost % 1000 == 0 {
            eprintln!(
                "[LOGGER ERROR] Sink write failed, {} messages lost so far: {}",
                lost, err
            );
        }
    }
}

fn validate_threshold(level: LogLevel) -> Result<()> {
    if level.is_user_level() {
        Ok(())
    } else {
        Err(LoggerError::config(
            "Logger",
            format!("{} is reserved and cannot be used as a threshold", level),
        ))
    }
}

/// Run a sink operation, turning a panic into an error so a misbehaving sink
/// cannot take the writer thread down with it.
fn guard_sink<T>(op: impl FnOnce() -> io::Result<T>) -> io::Result<T> {
    match catch_unwind(AssertUnwindSafe(op)) {
        Ok(result) => result,
        Err(payload) => Err(io::Error::new(
            io::ErrorKind::Other,
            format!("sink panicked: {}", panic_message(payload.as_ref())),
        )),
    }
}

/// Writer loop: pop in order, format, write.
///
/// `pop` only returns `None` once the queue is closed and drained, so every
/// message accepted before `close()` is written before this returns.
/// Dropping `_done` on the way out releases everyone waiting in `close()`.
fn run_consumer(shared: &Shared, _done: Sender<()>) {
    while let Some(message) = shared.queue.pop() {
        shared.write_message(&message);
        if shared.queue.is_empty() {
            shared.flush_sink();
        }
    }
    shared.flush_sink();
}

struct Inner {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
    done: Receiver<()>,
}

impl Inner {
    fn close_at(&self, call_site: CallSite) -> Result<()> {
        if self.shared.closed.swap(true, Ordering::AcqRel) {
            // Someone else is closing; share their drain barrier.
            self.wait_for_drain();
            return Err(LoggerError::AlreadyClosed);
        }

        let marker = Message::with_call_site(LogLevel::System, CLOSED_MESSAGE, call_site);
        match self.shared.queue.push_and_close(marker) {
            Ok(()) => {
                self.shared.metrics.record_enqueued();
            }
            Err(_) => {
                self.shared.queue.close();
            }
        }

        self.wait_for_drain();

        if let Some(handle) = self.worker.lock().take() {
            handle.join().map_err(LoggerError::worker_panicked)?;
        }
        Ok(())
    }

    fn wait_for_drain(&self) {
        // The writer never sends; recv returns once its sender is dropped.
        let _ = self.done.recv();
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if self.shared.closed.load(Ordering::Acquire) {
            return;
        }
        if let Err(e) = self.close_at(CallSite::unknown()) {
            eprintln!("[LOGGER ERROR] Failed to close logger on drop: {}", e);
        }
    }
}

/// Handle to a running logger.
///
/// Cloning is cheap and every clone feeds the same queue, so a logger can be
/// handed to as many producer threads as needed. When the last handle is
/// dropped without an explicit [`close`](Logger::close), the logger closes
/// itself, draining the queue first.
///
/// # Example
///
/// ```
/// use queued_logger::prelude::*;
/// use queued_logger::sinks::MemorySink;
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder()
///     .level(LogLevel::Info)
///     .queue_capacity(16)
///     .sink(sink.clone())
///     .build()?;
///
/// logger.debug("filtered out");
/// logger.info("kept");
/// logger.close()?;
///
/// let lines = sink.lines();
/// assert_eq!(lines.len(), 3);
/// assert!(lines[0].ends_with("Logger started"));
/// assert!(lines[1].ends_with("kept"));
/// assert!(lines[2].ends_with("Logger closed"));
/// # Ok::<(), LoggerError>(())
/// ```
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

impl Logger {
    /// Build and start a logger, writing to stdout when `sink` is `None`.
    ///
    /// The logger is registered with the process signal supervisor, so a
    /// termination signal closes it (draining the queue) before the process
    /// exits.
    #[track_caller]
    pub fn new(level: LogLevel, queue_capacity: usize, sink: Option<BoxedSink>) -> Result<Self> {
        Self::builder()
            .level(level)
            .queue_capacity(queue_capacity)
            .boxed_sink(sink)
            .handle_signals(true)
            .build()
    }

    /// Build a logger without starting its writer thread.
    ///
    /// Signal handling is not enabled; use the builder to opt in.
    pub fn unstarted(
        level: LogLevel,
        queue_capacity: usize,
        sink: Option<BoxedSink>,
    ) -> Result<UnstartedLogger> {
        Self::builder()
            .level(level)
            .queue_capacity(queue_capacity)
            .boxed_sink(sink)
            .build_unstarted()
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Submit a message at `level`.
    ///
    /// Messages below the threshold are dropped. When the queue is full the
    /// call blocks until the writer makes room. After `close()` this is a
    /// silent no-op. `LogLevel::System` is reserved for the logger's own
    /// notices and is refused.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !level.is_user_level() {
            self.inner.shared.metrics.record_rejected();
            return;
        }
        self.inner
            .shared
            .submit(level, message.into(), CallSite::caller());
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Close the logger and wait until every accepted message is written.
    ///
    /// A final `Logger closed` notice is enqueued as the last message, the
    /// queue stops accepting input, and this call blocks until the writer has
    /// drained everything to the sink.
    ///
    /// Closing is one-shot. Any later call (or a concurrent call that lost the
    /// race) waits for the same drain and returns
    /// [`LoggerError::AlreadyClosed`] without writing anything.
    #[track_caller]
    pub fn close(&self) -> Result<()> {
        self.inner.close_at(CallSite::caller())
    }

    pub fn level(&self) -> LogLevel {
        self.inner.shared.level()
    }

    /// Change the threshold for messages submitted from now on.
    ///
    /// Messages already queued are not re-filtered.
    pub fn set_level(&self, level: LogLevel) -> Result<()> {
        self.inner.shared.set_level(level)
    }

    /// Replace the sink, returning the previous one after flushing it.
    pub fn set_writer(&self, sink: impl Sink + 'static) -> BoxedSink {
        self.inner.shared.set_writer(Box::new(sink))
    }

    pub fn state(&self) -> LoggerState {
        if self.is_closed() {
            LoggerState::Closed
        } else {
            LoggerState::Running
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.shared.closed.load(Ordering::Acquire)
    }

    /// Number of messages waiting to be written.
    pub fn pending(&self) -> usize {
        self.inner.shared.queue.len()
    }

    pub fn queue_capacity(&self) -> usize {
        self.inner.shared.queue.capacity()
    }

    /// Get the logger metrics for detailed observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.inner.shared.metrics
    }

    /// A handle that does not keep the logger alive.
    pub fn downgrade(&self) -> WeakLogger {
        WeakLogger {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("state", &self.state())
            .field("queue", &self.inner.shared.queue)
            .finish()
    }
}

/// Non-owning handle to a [`Logger`].
#[derive(Clone)]
pub struct WeakLogger {
    inner: Weak<Inner>,
}

impl WeakLogger {
    pub fn upgrade(&self) -> Option<Logger> {
        self.inner.upgrade().map(|inner| Logger { inner })
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

/// A configured logger whose writer thread has not been started.
///
/// It can be reconfigured but not logged to or closed; [`start`] turns it
/// into a running [`Logger`].
///
/// [`start`]: UnstartedLogger::start
pub struct UnstartedLogger {
    shared: Shared,
    handle_signals: bool,
}

impl UnstartedLogger {
    pub(crate) fn from_config(config: &LoggerConfig, sink: Option<BoxedSink>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            shared: Shared::new(config.level, config.queue_capacity, sink)?,
            handle_signals: config.handle_signals,
        })
    }

    pub fn state(&self) -> LoggerState {
        LoggerState::Unstarted
    }

    pub fn level(&self) -> LogLevel {
        self.shared.level()
    }

    pub fn set_level(&self, level: LogLevel) -> Result<()> {
        self.shared.set_level(level)
    }

    pub fn set_writer(&self, sink: impl Sink + 'static) -> BoxedSink {
        self.shared.set_writer(Box::new(sink))
    }

    pub fn queue_capacity(&self) -> usize {
        self.shared.queue.capacity()
    }

    /// Start the writer thread and emit the `Logger started` notice.
    #[track_caller]
    pub fn start(self) -> Result<Logger> {
        let call_site = CallSite::caller();
        let supervisor = ShutdownSupervisor::global();
        if self.handle_signals {
            supervisor.listen()?;
        }

        let shared = Arc::new(self.shared);
        let (done_tx, done_rx) = bounded::<()>(0);
        let worker = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name(CONSUMER_THREAD_NAME.to_string())
                .spawn(move || run_consumer(&shared, done_tx))?
        };

        let logger = Logger {
            inner: Arc::new(Inner {
                shared,
                worker: Mutex::new(Some(worker)),
                done: done_rx,
            }),
        };

        if self.handle_signals {
            supervisor.register(&logger);
        }
        logger
            .inner
            .shared
            .submit(LogLevel::System, STARTED_MESSAGE.to_string(), call_site);
        Ok(logger)
    }
}

impl std::fmt::Debug for UnstartedLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnstartedLogger")
            .field("level", &self.level())
            .field("queue", &self.shared.queue)
            .field("handle_signals", &self.handle_signals)
            .finish()
    }
}
