//! `company-auth`: bearer token verification, decoupled from HTTP.

pub mod claims;
pub mod jwt;

pub use claims::{CLOCK_SKEW_SECS, Claims, TokenValidationError, validate_claims};
pub use jwt::{AuthConfig, Hs256JwtValidator, JwtValidator};
