use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use company_core::{CompanyPatch, validate_company};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub async fn get_company(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_company_id(&id, "invalid company id") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.companies.get_company_by_id(id).await {
        Ok(company) => (StatusCode::OK, Json(company)).into_response(),
        Err(e) => errors::store_error_to_response(e, StatusCode::NOT_FOUND),
    }
}

pub async fn create_company(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::CreateCompanyRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return errors::json_error(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let company = match body.into_company() {
        Ok(company) => company,
        Err(resp) => return resp,
    };

    if let Err(e) = validate_company(&company) {
        return errors::json_error(StatusCode::BAD_REQUEST, e.to_string());
    }

    info!(subject = principal.log_subject(), company_id = %company.id, "create company");

    match services.companies.create_company(company).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => errors::store_error_to_response(e, StatusCode::NOT_FOUND),
    }
}

pub async fn patch_company(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_company_id(&id, "invalid company id") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let patch = match body {
        Ok(Json(value)) => match CompanyPatch::from_json(&value) {
            Ok(patch) => patch,
            Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, e.to_string()),
        },
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid request body"),
    };

    // A missing company is a bad request on this route, not a 404.
    let current = match services.companies.get_company_by_id(id).await {
        Ok(company) => company,
        Err(e) => return errors::store_error_to_response(e, StatusCode::BAD_REQUEST),
    };

    info!(subject = principal.log_subject(), company_id = %id, "patch company");

    match services.companies.patch_company(&current, &patch).await {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(e) => errors::store_error_to_response(e, StatusCode::BAD_REQUEST),
    }
}

pub async fn delete_company(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_company_id(&id, "invalid company ID") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    info!(subject = principal.log_subject(), company_id = %id, "delete company");

    match services.companies.delete_company(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e, StatusCode::NOT_FOUND),
    }
}
