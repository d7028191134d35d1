//! Company outcome events and the keyed bus they travel on.

pub mod bus;
pub mod envelope;
pub mod in_memory_bus;
pub mod publisher;

pub use bus::{BusError, EventBus, KeyedMessage, Subscription};
pub use envelope::{CompanyEvent, CompanyEventType};
pub use in_memory_bus::InMemoryEventBus;
pub use publisher::{CompanyEventPublisher, PublishError};
