//! In-memory event bus for tests/dev.

use std::sync::{Mutex, mpsc};

use async_trait::async_trait;

use crate::bus::{BusError, EventBus, KeyedMessage, Subscription};

/// In-memory pub/sub bus.
///
/// - No IO
/// - Fan-out: every subscriber gets a copy
/// - Publishing with no subscribers succeeds and drops the message
#[derive(Debug)]
pub struct InMemoryEventBus {
    topic: String,
    subscribers: Mutex<Vec<mpsc::Sender<KeyedMessage>>>,
}

impl InMemoryEventBus {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self) -> Subscription<KeyedMessage> {
        let (tx, rx) = mpsc::channel();

        // A poisoned lock still yields a subscription; it just never receives.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new("company-events")
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    fn topic(&self) -> &str {
        &self.topic
    }

    async fn publish(&self, message: KeyedMessage) -> Result<(), BusError> {
        let mut subs = self.subscribers.lock().map_err(|_| BusError::Closed)?;

        // Drop any dead subscribers while publishing.
        subs.retain(|tx| tx.send(message.clone()).is_ok());

        Ok(())
    }
}
