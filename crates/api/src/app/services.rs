//! Service wiring: in-memory (dev/tests) or Postgres + Redis (persistent).

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::info;

use company_events::{EventBus, InMemoryEventBus};
use company_infra::event_bus::{RedisStreamsError, RedisStreamsEventBus};
use company_infra::{CompanyService, CompanyStore, InMemoryCompanyStore, PostgresCompanyStore, StoreError};

use crate::config::AppConfig;

pub type AppCompanyService = CompanyService<Arc<dyn CompanyStore>, Arc<dyn EventBus>>;

#[derive(Debug, Error)]
pub enum ServicesError {
    #[error("DATABASE_URL is required for persistent stores")]
    MissingDatabaseUrl,

    #[error("failed to connect to Postgres: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to prepare schema: {0}")]
    Schema(#[from] StoreError),

    #[error(transparent)]
    Redis(#[from] RedisStreamsError),
}

/// Shared handles for request handlers.
#[derive(Clone)]
pub struct AppServices {
    pub companies: Arc<AppCompanyService>,
}

impl AppServices {
    pub fn new(store: Arc<dyn CompanyStore>, bus: Arc<dyn EventBus>) -> Self {
        Self {
            companies: Arc::new(CompanyService::new(store, bus)),
        }
    }

    /// In-memory store and bus; nothing leaves the process.
    pub fn in_memory(topic: impl Into<String>) -> Self {
        Self::new(
            Arc::new(InMemoryCompanyStore::new()),
            Arc::new(InMemoryEventBus::new(topic)),
        )
    }
}

pub async fn build_services(config: &AppConfig) -> Result<AppServices, ServicesError> {
    if !config.use_persistent_stores {
        info!(topic = %config.events_topic, "using in-memory store and event bus");
        return Ok(AppServices::in_memory(config.events_topic.clone()));
    }

    let database_url = config
        .database_url
        .as_deref()
        .ok_or(ServicesError::MissingDatabaseUrl)?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(database_url)
        .await?;

    let store = PostgresCompanyStore::new(pool);
    store.ensure_schema().await?;

    let bus =
        RedisStreamsEventBus::connect(&config.redis_url, Some(config.events_topic.clone())).await?;

    info!(
        stream_key = %bus.stream_key(),
        max_connections = config.database_max_connections,
        "using Postgres store and Redis Streams event bus"
    );

    Ok(AppServices::new(Arc::new(store), Arc::new(bus)))
}
