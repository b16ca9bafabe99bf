//! Bounded FIFO between producer threads and the single writer thread

use super::error::{LoggerError, Result};
use super::message::Message;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::RwLock;

/// How a successful push got its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    /// There was room in the buffer.
    Immediately,
    /// The buffer was full and the producer waited for the consumer.
    AfterBlocking,
}

/// Bounded, ordered buffer of pending messages.
///
/// Producers push through a shared `Sender` guarded by a read lock; closing
/// takes the write lock and drops that `Sender`, so a push either completes
/// before the close or observes the queue as closed. Once closed and drained,
/// `pop` returns `None` instead of blocking.
pub struct MessageQueue {
    sender: RwLock<Option<Sender<Message>>>,
    receiver: Receiver<Message>,
    capacity: usize,
}

impl MessageQueue {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(LoggerError::config(
                "MessageQueue",
                "capacity must be a positive integer",
            ));
        }

        let (sender, receiver) = bounded(capacity);
        Ok(Self {
            sender: RwLock::new(Some(sender)),
            receiver,
            capacity,
        })
    }

    /// Push a message, blocking while the queue is full.
    ///
    /// There is no timeout: if the consumer stops making progress, the
    /// producer waits indefinitely.
    pub fn push(&self, message: Message) -> Result<Enqueued> {
        let guard = self.sender.read();
        let sender = guard.as_ref().ok_or(LoggerError::QueueClosed)?;

        match sender.try_send(message) {
            Ok(()) => Ok(Enqueued::Immediately),
            Err(TrySendError::Full(message)) => sender
                .send(message)
                .map(|()| Enqueued::AfterBlocking)
                .map_err(|_| LoggerError::QueueClosed),
            Err(TrySendError::Disconnected(_)) => Err(LoggerError::QueueClosed),
        }
    }

    /// Push a final message and close the input side in one step.
    ///
    /// No other producer can enqueue between the two, so `message` is the
    /// last one the consumer will see.
    pub fn push_and_close(&self, message: Message) -> Result<()> {
        let mut guard = self.sender.write();
        let sender = guard.take().ok_or(LoggerError::QueueClosed)?;
        sender.send(message).map_err(|_| LoggerError::QueueClosed)
    }

    /// Close the input side. Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        self.sender.write().take().is_some()
    }

    /// Take the next message, blocking while the queue is empty and open.
    ///
    /// Returns `None` only once the queue is closed and fully drained.
    pub fn pop(&self) -> Option<Message> {
        self.receiver.recv().ok()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl std::fmt::Debug for MessageQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageQueue")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn message(text: &str) -> Message {
        Message::new(LogLevel::Info, text)
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = MessageQueue::new(0).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_fifo_order() {
        let queue = MessageQueue::new(8).unwrap();
        for text in ["a", "b", "c"] {
            assert_eq!(queue.push(message(text)).unwrap(), Enqueued::Immediately);
        }
        assert_eq!(queue.len(), 3);

        let popped: Vec<String> = (0..3)
            .map(|_| queue.pop().unwrap().text().to_string())
            .collect();
        assert_eq!(popped, ["a", "b", "c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pop_returns_none_after_close_and_drain() {
        let queue = MessageQueue::new(4).unwrap();
        queue.push(message("left over")).unwrap();
        assert!(queue.close());
        assert!(!queue.close());

        assert_eq!(queue.pop().unwrap().text(), "left over");
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_push_after_close_fails() {
        let queue = MessageQueue::new(4).unwrap();
        queue.close();
        let result = queue.push(message("late"));
        assert!(matches!(result, Err(LoggerError::QueueClosed)));
        assert!(queue.is_closed());
    }

    #[test]
    fn test_push_and_close_is_last() {
        let queue = MessageQueue::new(4).unwrap();
        queue.push(message("first")).unwrap();
        queue.push_and_close(message("last")).unwrap();

        assert!(queue.push(message("too late")).is_err());
        assert!(matches!(
            queue.push_and_close(message("again")),
            Err(LoggerError::QueueClosed)
        ));

        assert_eq!(queue.pop().unwrap().text(), "first");
        assert_eq!(queue.pop().unwrap().text(), "last");
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_full_queue_blocks_until_popped() {
        let queue = Arc::new(MessageQueue::new(1).unwrap());
        queue.push(message("one")).unwrap();

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.push(message("two")).unwrap())
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!producer.is_finished());

        assert_eq!(queue.pop().unwrap().text(), "one");
        assert_eq!(producer.join().unwrap(), Enqueued::AfterBlocking);
        assert_eq!(queue.pop().unwrap().text(), "two");
    }

    #[test]
    fn test_pop_blocks_while_open() {
        let queue = Arc::new(MessageQueue::new(2).unwrap());

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.pop().map(|m| m.text().to_string()))
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!consumer.is_finished());

        queue.push(message("wake")).unwrap();
        assert_eq!(consumer.join().unwrap().as_deref(), Some("wake"));
    }
}
