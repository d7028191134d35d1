//! Company persistence.
//!
//! `CompanyStore` is the only way operations touch stored companies. Two
//! implementations: Postgres (sqlx) for deployments and an in-memory map for
//! dev/tests. Both enforce the same rules:
//!
//! - entities are validated before they are written
//! - names are unique case-insensitively (pre-check, then the storage guard)
//! - a failed patch applies nothing

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use company_core::{Company, CompanyId, CompanyPatch, DomainError};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryCompanyStore;
pub use postgres::PostgresCompanyStore;

/// Message for a duplicate (case-insensitive) company name.
pub const NAME_TAKEN_MESSAGE: &str = "company name must be unique";

/// Message for a duplicate primary key.
pub const ID_TAKEN_MESSAGE: &str = "company id already exists";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("company not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<DomainError> for StoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => StoreError::Validation(msg),
            DomainError::InvalidId(_) => StoreError::Validation(err.to_string()),
            DomainError::NotFound => StoreError::NotFound,
            DomainError::Conflict(msg) => StoreError::Conflict(msg),
        }
    }
}

#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn find_by_id(&self, id: CompanyId) -> Result<Company, StoreError>;

    /// Persist a new company; returns it with store-assigned timestamps.
    async fn create(&self, company: Company) -> Result<Company, StoreError>;

    /// Hard delete by id.
    async fn delete(&self, company: &Company) -> Result<(), StoreError>;

    /// Apply every present field of `patch` to the stored row identified by
    /// `company.id`, all or nothing, and return the full current row.
    ///
    /// An empty patch writes nothing and returns the row as stored.
    async fn patch_update(&self, company: &Company, patch: &CompanyPatch) -> Result<Company, StoreError>;
}

#[async_trait]
impl<S> CompanyStore for Arc<S>
where
    S: CompanyStore + ?Sized,
{
    async fn find_by_id(&self, id: CompanyId) -> Result<Company, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn create(&self, company: Company) -> Result<Company, StoreError> {
        (**self).create(company).await
    }

    async fn delete(&self, company: &Company) -> Result<(), StoreError> {
        (**self).delete(company).await
    }

    async fn patch_update(&self, company: &Company, patch: &CompanyPatch) -> Result<Company, StoreError> {
        (**self).patch_update(company, patch).await
    }
}
