use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use company_infra::StoreError;

/// Map a store/operation error to a response.
///
/// `not_found` is the status for a missing company, which differs per route.
pub fn store_error_to_response(err: StoreError, not_found: StatusCode) -> axum::response::Response {
    match err {
        StoreError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        StoreError::NotFound => json_error(not_found, err.to_string()),
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, msg),
        StoreError::Database(_) => json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

/// Error body: `{"error": {"message": "..."}}`.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": { "message": message.into() },
        })),
    )
        .into_response()
}
