//! Field rules for companies.
//!
//! The same per-field checks back both full-record validation (create) and
//! patch validation, so a field is accepted or rejected identically on either
//! path. Checks run in a fixed order and the first failure wins:
//! name, then description, then type.

use crate::company::{Company, CompanyType, MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
use crate::error::{DomainError, DomainResult};

pub const NAME_MESSAGE: &str = "name is required and must be 15 characters or less";
pub const DESCRIPTION_MESSAGE: &str = "description cannot exceed 3000 characters";
pub const TYPE_MESSAGE: &str = "invalid company type";

pub fn validate_name(name: &str) -> DomainResult<()> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(DomainError::validation(NAME_MESSAGE));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> DomainResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(DomainError::validation(DESCRIPTION_MESSAGE));
    }
    Ok(())
}

pub fn validate_type(company_type: &str) -> DomainResult<()> {
    if !CompanyType::is_allowed(company_type) {
        return Err(DomainError::validation(TYPE_MESSAGE));
    }
    Ok(())
}

/// Validate a full company record.
pub fn validate_company(company: &Company) -> DomainResult<()> {
    validate_name(&company.name)?;
    validate_description(&company.description)?;
    validate_type(&company.company_type)
}
