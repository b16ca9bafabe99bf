//! Sink implementations
//!
//! A sink is any destination that accepts the formatted bytes of a log line.
//! Every `std::io::Write + Send` value qualifies, so files, sockets and
//! in-memory buffers can be handed to the logger directly; the types here add
//! the conveniences a logger usually wants.

pub mod console;
pub mod file;
pub mod memory;
pub mod network;

pub use console::{ConsoleSink, ConsoleTarget};
pub use file::FileSink;
pub use memory::MemorySink;
pub use network::NetworkSink;

use std::io::Write;

/// Destination for formatted log lines.
pub trait Sink: Write + Send {}

impl<T: Write + Send + ?Sized> Sink for T {}

/// Owned, type-erased sink as stored by the logger.
pub type BoxedSink = Box<dyn Sink>;
