//! Infrastructure layer: company persistence, broker-backed event bus, and
//! the operations that tie them together.

pub mod company_service;
pub mod event_bus;
pub mod store;


pub use company_service::CompanyService;
pub use store::{
    CompanyStore, ID_TAKEN_MESSAGE, InMemoryCompanyStore, NAME_TAKEN_MESSAGE, PostgresCompanyStore,
    StoreError,
};
