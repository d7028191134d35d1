//! Company event publisher: envelope + serialize + keyed publish.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error};

use company_core::Company;

use crate::bus::{BusError, EventBus, KeyedMessage};
use crate::envelope::{CompanyEvent, CompanyEventType};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("event serialization failed: {0}")]
    Serialization(String),

    #[error("event publication failed: {0}")]
    Bus(#[from] BusError),
}

/// Wraps a bus and turns company outcomes into published events.
///
/// Every event is keyed by the company id, so all events for one company
/// share a partition/ordering key.
#[derive(Debug, Clone)]
pub struct CompanyEventPublisher<B> {
    bus: B,
}

impl<B> CompanyEventPublisher<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }
}

impl<B: EventBus> CompanyEventPublisher<B> {
    /// Publish one event. Failures are logged and returned; never retried.
    pub async fn publish(
        &self,
        event_type: CompanyEventType,
        company: &Company,
    ) -> Result<(), PublishError> {
        let event = CompanyEvent::new(event_type, company.clone(), Utc::now());

        let payload = serde_json::to_vec(&event).map_err(|e| {
            error!(event = %event_type, company_id = %company.id, "error marshaling event: {e}");
            PublishError::Serialization(e.to_string())
        })?;

        let message = KeyedMessage::new(company.id.to_string(), payload);

        if let Err(e) = self.bus.publish(message).await {
            error!(
                event = %event_type,
                company_id = %company.id,
                topic = %self.bus.topic(),
                "error publishing event: {e}"
            );
            return Err(e.into());
        }

        debug!(event = %event_type, company_id = %company.id, topic = %self.bus.topic(), "event published");
        Ok(())
    }
}
