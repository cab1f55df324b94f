use std::collections::VecDeque;
use std::sync::Mutex;

use crate::protocol::{Message, Result};
use crate::transport::MessageSink;

/// In-process transport that queues outbound messages.
///
/// Stands in for a real script context: the dispatcher delivers into the
/// queue, and the embedding host (or a test) drains it and feeds each
/// message to the script side one at a time, preserving emission order.
#[derive(Default)]
pub struct MemoryTransport {
    queue: Mutex<VecDeque<Message>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the oldest queued message.
    pub fn pop(&self) -> Option<Message> {
        self.queue.lock().unwrap().pop_front()
    }

    /// Remove and return all queued messages, oldest first.
    pub fn drain(&self) -> Vec<Message> {
        self.queue.lock().unwrap().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }
}

impl MessageSink for MemoryTransport {
    fn deliver(&self, message: Message) -> Result<()> {
        self.queue.lock().unwrap().push_back(message);
        Ok(())
    }
}
