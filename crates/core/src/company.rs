use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::CompanyId;

/// Maximum name length, in characters.
pub const MAX_NAME_LEN: usize = 15;

/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 3000;

/// The fixed set of company types a record may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompanyType {
    Corporations,
    NonProfit,
    Cooperative,
    SoleProprietorship,
}

impl CompanyType {
    pub const ALL: [CompanyType; 4] = [
        CompanyType::Corporations,
        CompanyType::NonProfit,
        CompanyType::Cooperative,
        CompanyType::SoleProprietorship,
    ];

    /// Wire/storage spelling (exact match, case-sensitive).
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyType::Corporations => "Corporations",
            CompanyType::NonProfit => "NonProfit",
            CompanyType::Cooperative => "Cooperative",
            CompanyType::SoleProprietorship => "Sole Proprietorship",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    pub fn is_allowed(s: &str) -> bool {
        Self::parse(s).is_some()
    }
}

impl core::fmt::Display for CompanyType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Company record.
///
/// `company_type` is kept as the raw string so an out-of-set value can be
/// carried up to validation and reported with the regular validation message
/// rather than failing at decode time.
///
/// Timestamps are owned by the store. They are `None` on snapshots that were
/// never persisted (e.g. the payload of a failed create event).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub employees: i64,
    pub registered: bool,
    #[serde(rename = "type")]
    pub company_type: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Company {
    /// Build an unpersisted company (no timestamps).
    pub fn new(
        id: CompanyId,
        name: impl Into<String>,
        description: impl Into<String>,
        employees: i64,
        registered: bool,
        company_type: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            employees,
            registered,
            company_type: company_type.into(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Same record with store-maintained fields cleared.
    pub fn without_timestamps(mut self) -> Self {
        self.created_at = None;
        self.updated_at = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_spellings_round_trip() {
        for t in CompanyType::ALL {
            assert_eq!(CompanyType::parse(t.as_str()), Some(t));
        }
        assert!(CompanyType::is_allowed("Sole Proprietorship"));
        assert!(!CompanyType::is_allowed("corporations"));
        assert!(!CompanyType::is_allowed("LLC"));
    }

    #[test]
    fn serializes_type_field_under_wire_name() {
        let c = Company::new(CompanyId::new(), "Acme", "", 5, true, "Corporations");
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["type"], "Corporations");
        assert_eq!(v["employees"], 5);
        assert!(v["created_at"].is_null());
        assert!(v.get("company_type").is_none());
    }

    #[test]
    fn description_and_timestamps_default_when_absent() {
        let c: Company = serde_json::from_value(serde_json::json!({
            "id": "2f1b5c4e-8a8e-4d0c-9a43-6f0a4e6f1c11",
            "name": "Acme",
            "employees": 1,
            "registered": false,
            "type": "NonProfit"
        }))
        .unwrap();
        assert_eq!(c.description, "");
        assert_eq!(c.created_at, None);
    }
}
