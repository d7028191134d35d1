use axum::{
    Router,
    routing::{delete, get, patch, post},
};

pub mod companies;
pub mod system;

/// Endpoints open to anonymous callers.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/companies/:id", get(companies::get_company))
}

/// Endpoints that require a valid bearer token.
pub fn protected_router() -> Router {
    Router::new()
        .route("/companies/createCompany", post(companies::create_company))
        .route("/companies/patchCompany/:id", patch(companies::patch_company))
        .route("/companies/deleteCompany/:id", delete(companies::delete_company))
}
