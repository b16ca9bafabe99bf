//! Stress tests for the producer/consumer core
//!
//! These tests verify:
//! - Nothing accepted before close is lost under heavy concurrent load
//! - The closed notice is always the final line
//! - Racing closers all wait for the drain and exactly one succeeds
//! - Producers racing with close never panic or block forever

use queued_logger::prelude::*;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

const CLOSED_MARKER: &str = "Logger closed";

fn memory_logger(capacity: usize) -> (Logger, MemorySink) {
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .level(LogLevel::Debug)
        .queue_capacity(capacity)
        .sink(sink.clone())
        .build()
        .expect("Failed to start logger");
    (logger, sink)
}

/// Many producers through a tiny queue: every message arrives exactly once
#[test]
fn test_no_loss_under_contention() {
    let (logger, sink) = memory_logger(4);
    let threads = 8;
    let per_thread = 200;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let logger = logger.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..per_thread {
                    logger.warn(format!("producer {} message {}", t, i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Producer panicked");
    }
    logger.close().expect("close should succeed");

    let lines = sink.lines();
    // started + messages + closed
    assert_eq!(lines.len(), threads * per_thread + 2);
    assert!(lines.last().unwrap().ends_with(CLOSED_MARKER));

    let metrics = logger.metrics();
    assert_eq!(metrics.enqueued() as usize, threads * per_thread + 2);
    assert_eq!(metrics.written(), metrics.enqueued());
    assert_eq!(metrics.write_failures(), 0);
}

/// Producers keep logging while another thread closes the logger
#[test]
fn test_close_while_producing() {
    let (logger, sink) = memory_logger(2);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    logger.info(format!("racer {} {}", t, i));
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(5));
    logger.close().expect("close should succeed");
    let written_at_close = sink.len();

    for handle in handles {
        handle.join().expect("Producer panicked");
    }

    // Nothing is written after close returns, and the notice is last
    assert_eq!(sink.len(), written_at_close);
    assert!(sink.lines().last().unwrap().ends_with(CLOSED_MARKER));

    let metrics = logger.metrics();
    assert_eq!(metrics.enqueued() as usize, sink.lines().len());
    assert_eq!(
        metrics.enqueued() + metrics.discarded(),
        4 * 500 + 2,
        "every call is either accepted or discarded"
    );
}

/// Concurrent closers: one succeeds, the rest report AlreadyClosed after the drain
#[test]
fn test_racing_closers() {
    let (logger, sink) = memory_logger(8);
    for i in 0..50 {
        logger.info(format!("pending {}", i));
    }

    let barrier = Arc::new(Barrier::new(4));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let logger = logger.clone();
            let barrier = Arc::clone(&barrier);
            let sink = sink.clone();
            thread::spawn(move || {
                barrier.wait();
                let result = logger.close();
                // Whoever returns, the drain is already complete
                assert!(sink.lines().last().unwrap().ends_with(CLOSED_MARKER));
                result.is_ok()
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().expect("Closer panicked"))
        .filter(|ok| *ok)
        .count();

    assert_eq!(successes, 1);
    assert_eq!(sink.lines().len(), 52);
    assert_eq!(sink.contents().matches(CLOSED_MARKER).count(), 1);
}
