//! Network sink for remote logging
//!
//! Sends log lines to a remote server over TCP.

use crate::core::Result;
use std::io::{self, Write};
use std::net::TcpStream;
use std::time::Duration;

const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// TCP sink with one reconnect attempt per failed write
///
/// # Example
///
/// ```no_run
/// use queued_logger::prelude::*;
/// use queued_logger::sinks::NetworkSink;
///
/// let sink = NetworkSink::connect("127.0.0.1:8080")
///     .expect("Failed to connect to log server");
///
/// let logger = Logger::new(LogLevel::Info, 1024, Some(Box::new(sink)))?;
/// logger.info("This log will be sent to 127.0.0.1:8080");
/// logger.close()?;
/// # Ok::<(), LoggerError>(())
/// ```
pub struct NetworkSink {
    stream: Option<TcpStream>,
    address: String,
    reconnect_on_error: bool,
}

impl NetworkSink {
    /// Connect to `address` (e.g. "localhost:8080")
    ///
    /// # Errors
    ///
    /// Returns error if connection fails
    pub fn connect(address: impl Into<String>) -> Result<Self> {
        let address = address.into();
        let stream = Self::open(&address)?;

        Ok(Self {
            stream: Some(stream),
            address,
            reconnect_on_error: true,
        })
    }

    /// Enable or disable automatic reconnection on errors
    ///
    /// Default: enabled
    #[must_use]
    pub fn with_reconnect(mut self, enable: bool) -> Self {
        self.reconnect_on_error = enable;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn open(address: &str) -> io::Result<TcpStream> {
        let stream = TcpStream::connect(address)?;
        stream.set_write_timeout(Some(WRITE_TIMEOUT))?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }

    fn send(&mut self, buf: &[u8]) -> io::Result<()> {
        match self.stream {
            Some(ref mut stream) => stream.write_all(buf),
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "network stream not connected",
            )),
        }
    }
}

impl Write for NetworkSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_all(buf)?;
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let err = match self.send(buf) {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };

        self.stream = None;
        if !self.reconnect_on_error {
            return Err(err);
        }

        match Self::open(&self.address) {
            Ok(stream) => {
                self.stream = Some(stream);
                self.send(buf)
            }
            Err(reconnect_err) => Err(io::Error::new(
                err.kind(),
                format!(
                    "failed to send log and reconnect: {} (reconnect: {})",
                    err, reconnect_err
                ),
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(ref mut stream) = self.stream {
            stream.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;

    #[test]
    fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        assert!(NetworkSink::connect(address).is_err());
    }

    #[test]
    fn test_sends_lines() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut line = String::new();
            BufReader::new(stream).read_line(&mut line).unwrap();
            line
        });

        let mut sink = NetworkSink::connect(address.clone()).unwrap();
        assert!(sink.is_connected());
        assert_eq!(sink.address(), address);
        sink.write_all(b"over the wire\n").unwrap();
        sink.flush().unwrap();

        assert_eq!(server.join().unwrap(), "over the wire\n");
    }

    #[test]
    fn test_write_without_connection() {
        let mut sink = NetworkSink {
            stream: None,
            address: "127.0.0.1:9".to_string(),
            reconnect_on_error: false,
        };

        assert!(sink.write_all(b"lost\n").is_err());
        assert!(!sink.is_connected());
    }
}
