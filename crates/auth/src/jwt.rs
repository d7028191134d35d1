use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::claims::{Claims, TokenValidationError, validate_claims};

/// Secret material for token verification, passed in at construction.
#[derive(Clone)]
pub struct AuthConfig {
    secret: Vec<u8>,
}

impl AuthConfig {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl core::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Verifies a bearer token and yields its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenValidationError>;
}

/// HS256 validator over a shared secret.
pub struct Hs256JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(config: AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Time claims are checked by `validate_claims` against the caller's clock.
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        Self {
            key: DecodingKey::from_secret(config.secret()),
            validation,
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenValidationError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenValidationError::InvalidSignature,
                _ => TokenValidationError::Malformed(e.to_string()),
            }
        })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn mint(secret: &[u8], claims: &Claims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn accepts_token_signed_with_configured_secret() {
        let validator = Hs256JwtValidator::new(AuthConfig::new("s3cret"));
        let now = Utc::now();
        let claims = Claims {
            sub: Some("tester".into()),
            iat: Some(now.timestamp()),
            exp: Some(now.timestamp() + 3600),
        };

        let token = mint(b"s3cret", &claims);
        assert_eq!(validator.validate(&token, now), Ok(claims));
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let validator = Hs256JwtValidator::new(AuthConfig::new("s3cret"));
        let token = mint(b"other", &Claims::default());
        assert_eq!(
            validator.validate(&token, Utc::now()),
            Err(TokenValidationError::InvalidSignature)
        );
    }

    #[test]
    fn rejects_garbage() {
        let validator = Hs256JwtValidator::new(AuthConfig::new("s3cret"));
        assert!(matches!(
            validator.validate("not-a-jwt", Utc::now()),
            Err(TokenValidationError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let validator = Hs256JwtValidator::new(AuthConfig::new("s3cret"));
        let now = Utc::now();
        let claims = Claims {
            exp: Some(now.timestamp() - 3600),
            ..Claims::default()
        };
        let token = mint(b"s3cret", &claims);
        assert_eq!(
            validator.validate(&token, now),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let shown = format!("{:?}", AuthConfig::new("s3cret"));
        assert!(!shown.contains("s3cret"));
    }
}
