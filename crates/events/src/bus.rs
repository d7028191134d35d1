//! Keyed message publishing abstraction (mechanics only).
//!
//! The bus is the black-box broker client: it takes an opaque payload and a
//! partition/ordering key and publishes it to one fixed topic.
//!
//! ## Delivery
//!
//! - **Best-effort**: a failed publish is reported to the caller and nothing
//!   else; the bus never retries.
//! - **Per-key ordering**: messages sharing a key keep their relative order
//!   if the transport preserves it (Redis Streams does: one stream, total order).
//! - **No persistence contract**: the bus is for notification, the store is the
//!   source of truth.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// A message ready for the transport: key plus serialized payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedMessage {
    pub key: String,
    pub payload: Vec<u8>,
}

impl KeyedMessage {
    pub fn new(key: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            payload,
        }
    }

    /// Payload as UTF-8 text (JSON payloads always are).
    pub fn payload_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.payload).ok()
    }
}

#[derive(Debug, Error)]
pub enum BusError {
    #[error("broker connection error: {0}")]
    Connection(String),

    #[error("broker rejected publish: {0}")]
    Rejected(String),

    #[error("bus closed")]
    Closed,
}

/// Keyed publish to a single topic.
///
/// Implementations must be safe for concurrent use by many in-flight requests.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Topic (stream) this bus publishes to.
    fn topic(&self) -> &str;

    async fn publish(&self, message: KeyedMessage) -> Result<(), BusError>;
}

#[async_trait]
impl<B> EventBus for Arc<B>
where
    B: EventBus + ?Sized,
{
    fn topic(&self) -> &str {
        (**self).topic()
    }

    async fn publish(&self, message: KeyedMessage) -> Result<(), BusError> {
        (**self).publish(message).await
    }
}

/// A subscription to messages published on an in-process bus.
///
/// Subscriptions are designed for single-threaded consumption.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything currently queued.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}
