use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed clock skew between the token issuer and this service.
pub const CLOCK_SKEW_SECS: i64 = 60;

/// JWT claims model (transport-agnostic).
///
/// Only "a valid token is present" matters to this service, so every claim is
/// optional; `exp` and `iat` are checked when the issuer sets them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (caller identity), informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration, seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued-at, seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate the time claims against `now`.
///
/// Signature verification happens before this, in the validator.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    let now = now.timestamp();

    if let (Some(iat), Some(exp)) = (claims.iat, claims.exp) {
        if exp <= iat {
            return Err(TokenValidationError::InvalidTimeWindow);
        }
    }
    if let Some(iat) = claims.iat {
        if iat > now + CLOCK_SKEW_SECS {
            return Err(TokenValidationError::NotYetValid);
        }
    }
    if let Some(exp) = claims.exp {
        if now >= exp + CLOCK_SKEW_SECS {
            return Err(TokenValidationError::Expired);
        }
    }
    Ok(())
}
