//! `company-core`: the company record and its rules.
//!
//! This crate contains **pure domain** code (no storage, no messaging).

pub mod company;
pub mod error;
pub mod id;
pub mod patch;
pub mod validation;

pub use company::{Company, CompanyType, MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
pub use error::{DomainError, DomainResult};
pub use id::CompanyId;
pub use patch::CompanyPatch;
pub use validation::validate_company;
