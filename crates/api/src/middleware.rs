use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use company_auth::JwtValidator;

use crate::app::errors;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Reject the request with 401 unless it carries a valid bearer token.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers()).map_err(unauthorized)?;

    let claims = state.jwt.validate(token, Utc::now()).map_err(|e| {
        debug!(error = %e, "rejected bearer token");
        unauthorized(INVALID_TOKEN)
    })?;

    req.extensions_mut().insert(PrincipalContext::new(claims.sub));

    Ok(next.run(req).await)
}

const MISSING_TOKEN: &str = "Unauthorized: missing token";
const INVALID_TOKEN_FORMAT: &str = "Unauthorized: invalid token format";
const INVALID_TOKEN: &str = "Unauthorized: invalid token";

fn unauthorized(message: &'static str) -> Response {
    errors::json_error(StatusCode::UNAUTHORIZED, message)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, &'static str> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(MISSING_TOKEN)?;

    let header = header.to_str().map_err(|_| INVALID_TOKEN_FORMAT)?;

    let header = header.strip_prefix("Bearer ").ok_or(INVALID_TOKEN_FORMAT)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(MISSING_TOKEN);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_str(value).unwrap(),
        );
        h
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def")), Ok("abc.def"));
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Err(MISSING_TOKEN));
        assert_eq!(extract_bearer(&headers("Basic abc")), Err(INVALID_TOKEN_FORMAT));
        assert_eq!(extract_bearer(&headers("Bearer   ")), Err(MISSING_TOKEN));
    }
}
