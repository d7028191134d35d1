//! Redis Streams-backed event bus.
//!
//! - **Stream Key**: one fixed stream per deployment (the topic), default
//!   `company-events`
//! - **Entry layout**: `XADD <stream> * key <company-id> payload <json>`
//! - **Ordering**: a single stream is totally ordered, so events for one
//!   company id are read back in publish order
//! - **No retries**: a failed XADD is returned to the publisher
//!
//! Uses a `ConnectionManager`, which reconnects on its own and is cheap to
//! clone per request.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::instrument;

use company_events::{BusError, EventBus, KeyedMessage};

/// Default stream key for company events
pub const DEFAULT_STREAM_KEY: &str = "company-events";

#[derive(Clone)]
pub struct RedisStreamsEventBus {
    conn: ConnectionManager,
    stream_key: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RedisStreamsError {
    #[error("Redis connection error: {0}")]
    Connection(String),
}

impl RedisStreamsEventBus {
    /// Connect to Redis and bind the bus to `stream_key`.
    ///
    /// # Arguments
    ///
    /// * `redis_url` - Redis connection URL (e.g., "redis://localhost:6379")
    /// * `stream_key` - Redis stream key (default: "company-events")
    pub async fn connect(
        redis_url: impl AsRef<str>,
        stream_key: Option<String>,
    ) -> Result<Self, RedisStreamsError> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| RedisStreamsError::Connection(e.to_string()))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| RedisStreamsError::Connection(e.to_string()))?;

        Ok(Self {
            conn,
            stream_key: stream_key.unwrap_or_else(|| DEFAULT_STREAM_KEY.to_string()),
        })
    }

    pub fn stream_key(&self) -> &str {
        &self.stream_key
    }
}

impl std::fmt::Debug for RedisStreamsEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStreamsEventBus")
            .field("stream_key", &self.stream_key)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl EventBus for RedisStreamsEventBus {
    fn topic(&self) -> &str {
        &self.stream_key
    }

    #[instrument(
        skip(self, message),
        fields(stream_key = %self.stream_key, key = %message.key),
        err
    )]
    async fn publish(&self, message: KeyedMessage) -> Result<(), BusError> {
        let mut conn = self.conn.clone();

        let _: String = redis::cmd("XADD")
            .arg(&self.stream_key)
            .arg("*") // Auto-generate entry ID
            .arg("key")
            .arg(&message.key)
            .arg("payload")
            .arg(&message.payload)
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        Ok(())
    }
}

fn map_redis_error(err: redis::RedisError) -> BusError {
    if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
        BusError::Connection(err.to_string())
    } else {
        BusError::Rejected(format!("XADD failed: {err}"))
    }
}
