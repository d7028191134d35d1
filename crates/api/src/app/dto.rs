use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use company_core::{Company, CompanyId};

use crate::app::errors;

/// Body of `POST /companies/createCompany`.
///
/// The id is supplied by the client. Timestamps in the body are ignored.
/// A missing or `null` description is stored as empty.
#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub employees: i64,
    pub registered: bool,
    #[serde(rename = "type")]
    pub company_type: String,
}

impl CreateCompanyRequest {
    /// Requires a non-nil id.
    pub fn into_company(self) -> Result<Company, axum::response::Response> {
        let id = self
            .id
            .filter(|id| !id.is_nil())
            .ok_or_else(|| errors::json_error(StatusCode::BAD_REQUEST, "company ID is required"))?;

        Ok(Company::new(
            CompanyId::from_uuid(id),
            self.name,
            self.description.unwrap_or_default(),
            self.employees,
            self.registered,
            self.company_type,
        ))
    }
}

pub fn parse_company_id(raw: &str, message: &'static str) -> Result<CompanyId, axum::response::Response> {
    raw.parse::<CompanyId>()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: serde_json::Value) -> CreateCompanyRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn null_or_missing_description_becomes_empty() {
        let id = Uuid::new_v4();
        for description in [json!(null), json!("")] {
            let company = request(json!({
                "id": id,
                "name": "Acme",
                "description": description,
                "employees": 5,
                "registered": true,
                "type": "Corporations"
            }))
            .into_company()
            .unwrap();
            assert_eq!(company.description, "");
        }

        let company = request(json!({
            "id": id,
            "name": "Acme",
            "employees": 5,
            "registered": true,
            "type": "Corporations"
        }))
        .into_company()
        .unwrap();
        assert_eq!(company.description, "");
    }

    #[test]
    fn nil_id_is_rejected() {
        let res = request(json!({
            "id": Uuid::nil(),
            "name": "Acme",
            "employees": 5,
            "registered": true,
            "type": "Corporations"
        }))
        .into_company();
        assert_eq!(res.unwrap_err().status(), StatusCode::BAD_REQUEST);
    }
}
