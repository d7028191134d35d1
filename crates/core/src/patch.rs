//! Typed partial update for a company.
//!
//! A patch arrives as an untyped JSON object. It is decoded against a closed
//! set of recognized fields; everything else is dropped with a debug log.

use serde_json::{Map, Value};

use crate::company::Company;
use crate::error::{DomainError, DomainResult};
use crate::validation::{validate_description, validate_name, validate_type};

/// Partial update: `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub employees: Option<i64>,
    pub registered: Option<bool>,
    pub company_type: Option<String>,
}

impl CompanyPatch {
    /// Decode a patch from a JSON value.
    ///
    /// The value must be an object. A recognized key holding a value of the
    /// wrong JSON type is a validation error; `null` counts as absent.
    pub fn from_json(value: &Value) -> DomainResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| DomainError::validation("invalid request body"))?;
        Self::from_map(map)
    }

    pub fn from_map(map: &Map<String, Value>) -> DomainResult<Self> {
        let mut patch = CompanyPatch::default();

        for (key, value) in map {
            if value.is_null() {
                continue;
            }
            match key.as_str() {
                "name" => patch.name = Some(expect_string(key, value)?),
                "description" => patch.description = Some(expect_string(key, value)?),
                "type" => patch.company_type = Some(expect_string(key, value)?),
                "employees" => {
                    let n = value
                        .as_i64()
                        .ok_or_else(|| DomainError::validation("employees must be an integer"))?;
                    patch.employees = Some(n);
                }
                "registered" => {
                    let b = value
                        .as_bool()
                        .ok_or_else(|| DomainError::validation("registered must be a boolean"))?;
                    patch.registered = Some(b);
                }
                other => {
                    tracing::debug!(field = %other, "ignoring unrecognized patch field");
                }
            }
        }

        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.employees.is_none()
            && self.registered.is_none()
            && self.company_type.is_none()
    }

    /// Validate only the fields present, using the same rules and order as
    /// full-record validation. Uniqueness is the store's job.
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(company_type) = &self.company_type {
            validate_type(company_type)?;
        }
        Ok(())
    }

    /// Return `company` with every present field overwritten.
    ///
    /// Timestamps are left untouched; the caller (store) maintains them.
    pub fn apply_to(&self, company: &Company) -> Company {
        let mut next = company.clone();
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(description) = &self.description {
            next.description = description.clone();
        }
        if let Some(employees) = self.employees {
            next.employees = employees;
        }
        if let Some(registered) = self.registered {
            next.registered = registered;
        }
        if let Some(company_type) = &self.company_type {
            next.company_type = company_type.clone();
        }
        next
    }
}

fn expect_string(key: &str, value: &Value) -> DomainResult<String> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| DomainError::validation(format!("{key} must be a string")))
}
