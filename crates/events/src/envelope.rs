use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use company_core::Company;

/// Outcome of a mutating company operation, as announced on the topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanyEventType {
    #[serde(rename = "COMPANY_CREATED_SUCCESS")]
    CreatedSuccess,
    #[serde(rename = "COMPANY_CREATED_FAILED")]
    CreatedFailed,
    #[serde(rename = "COMPANY_DELETED_SUCCESS")]
    DeletedSuccess,
    #[serde(rename = "COMPANY_DELETED_FAILED")]
    DeletedFailed,
    #[serde(rename = "COMPANY_PATCHED_SUCCESS")]
    PatchedSuccess,
    #[serde(rename = "COMPANY_PATCHED_FAILED")]
    PatchedFailed,
}

impl CompanyEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyEventType::CreatedSuccess => "COMPANY_CREATED_SUCCESS",
            CompanyEventType::CreatedFailed => "COMPANY_CREATED_FAILED",
            CompanyEventType::DeletedSuccess => "COMPANY_DELETED_SUCCESS",
            CompanyEventType::DeletedFailed => "COMPANY_DELETED_FAILED",
            CompanyEventType::PatchedSuccess => "COMPANY_PATCHED_SUCCESS",
            CompanyEventType::PatchedFailed => "COMPANY_PATCHED_FAILED",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            CompanyEventType::CreatedSuccess
                | CompanyEventType::DeletedSuccess
                | CompanyEventType::PatchedSuccess
        )
    }
}

impl core::fmt::Display for CompanyEventType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope published after a mutating operation.
///
/// Serialized as `{"event": ..., "company": {...}, "time": "<RFC3339>"}`.
/// Nothing about it is persisted; once handed to the bus it is forgotten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyEvent {
    event: CompanyEventType,
    company: Company,
    time: String,
}

impl CompanyEvent {
    pub fn new(event: CompanyEventType, company: Company, at: DateTime<Utc>) -> Self {
        Self {
            event,
            company,
            time: at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    pub fn event_type(&self) -> CompanyEventType {
        self.event
    }

    pub fn company(&self) -> &Company {
        &self.company
    }

    pub fn time(&self) -> &str {
        &self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use company_core::CompanyId;

    #[test]
    fn wire_shape_matches_topic_contract() {
        let company = Company::new(CompanyId::new(), "Acme", "", 5, true, "Corporations");
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let event = CompanyEvent::new(CompanyEventType::CreatedSuccess, company.clone(), at);

        let v = serde_json::to_value(&event).unwrap();
        assert_eq!(v["event"], "COMPANY_CREATED_SUCCESS");
        assert_eq!(v["time"], "2024-03-01T12:30:00Z");
        assert_eq!(v["company"]["id"], company.id.to_string());
        assert_eq!(v["company"]["type"], "Corporations");
    }

    #[test]
    fn success_and_failure_kinds() {
        assert!(CompanyEventType::PatchedSuccess.is_success());
        assert!(!CompanyEventType::DeletedFailed.is_success());
        assert_eq!(
            serde_json::to_value(CompanyEventType::DeletedFailed).unwrap(),
            CompanyEventType::DeletedFailed.as_str()
        );
    }
}
