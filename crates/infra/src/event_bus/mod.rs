//! Infrastructure event bus implementations.
//!
//! The bus abstraction lives in `company-events` as pure mechanics.
//! This module provides broker-backed implementations (Redis).

#[cfg(feature = "redis")]
pub mod redis_streams;

#[cfg(feature = "redis")]
pub use redis_streams::{RedisStreamsError, RedisStreamsEventBus};
