//! Strongly-typed company identifier.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a company (primary key, client-supplied on create).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(Uuid);

impl CompanyId {
    /// Create a fresh random identifier. Mostly useful in tests; callers
    /// normally supply their own id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// The nil UUID is treated as "no id supplied".
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for CompanyId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for CompanyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for CompanyId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<CompanyId> for Uuid {
    fn from(value: CompanyId) -> Self {
        value.0
    }
}

impl FromStr for CompanyId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s)
            .map_err(|e| DomainError::invalid_id(format!("CompanyId: {e}")))?;
        Ok(Self(uuid))
    }
}
