//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store/bus wiring (in-memory or Postgres + Redis)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs and path parsing
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use company_auth::{AuthConfig, Hs256JwtValidator};

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, ServicesError};

/// Build the full HTTP router from configuration (entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> Result<Router, ServicesError> {
    let services = services::build_services(config).await?;
    Ok(build_router(services, AuthConfig::new(config.jwt_secret.clone())))
}

/// Assemble routes, auth and tracing around already-built services.
pub fn build_router(services: AppServices, auth: AuthConfig) -> Router {
    let jwt = Arc::new(Hs256JwtValidator::new(auth));
    let auth_state = middleware::AuthState { jwt };

    // Protected routes: require a valid bearer token.
    let protected = routes::protected_router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .merge(routes::public_router())
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(Arc::new(services))),
        )
}
