//! HS256 access tokens
//!
//! Tokens carry the user id as `sub` and must be issued by `tubely-access`.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tubely_core::constants::TOKEN_ISSUER;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Couldn't find JWT")]
    MissingHeader,

    #[error("Authorization header must use the Bearer scheme")]
    MalformedHeader,

    #[error("Token has expired")]
    Expired,

    #[error("Couldn't validate JWT: {0}")]
    InvalidToken(String),

    #[error("Token subject is not a user id")]
    InvalidSubject,
}

/// Maps a bearer credential to the user it was issued for.
pub trait Authenticator: Send + Sync {
    fn validate(&self, token: &str) -> Result<Uuid, AuthError>;
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String, // user_id
    pub iat: i64,
    pub exp: i64,
}

pub struct JwtAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for `user_id` valid for `expires_in`.
    pub fn issue_token(&self, user_id: Uuid, expires_in: Duration) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: TOKEN_ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now,
            exp: now + expires_in.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl Authenticator for JwtAuthenticator {
    fn validate(&self, token: &str) -> Result<Uuid, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::InvalidSubject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-jwt-secret-at-least-32-characters";

    #[test]
    fn test_issued_token_validates() {
        let auth = JwtAuthenticator::new(SECRET);
        let user_id = Uuid::new_v4();

        let token = auth.issue_token(user_id, Duration::from_secs(3600)).unwrap();
        assert_eq!(auth.validate(&token).unwrap(), user_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtAuthenticator::new(SECRET)
            .issue_token(Uuid::new_v4(), Duration::from_secs(3600))
            .unwrap();

        let other = JwtAuthenticator::new("another-secret-at-least-32-characters!!");
        assert!(matches!(
            other.validate(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = JwtAuthenticator::new(SECRET);
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: TOKEN_ISSUER.to_string(),
            sub: Uuid::new_v4().to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::default(), &claims, &auth.encoding_key).unwrap();

        assert!(matches!(auth.validate(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let auth = JwtAuthenticator::new(SECRET);
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: "someone-else".to_string(),
            sub: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(&Header::default(), &claims, &auth.encoding_key).unwrap();

        assert!(auth.validate(&token).is_err());
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let auth = JwtAuthenticator::new(SECRET);
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: TOKEN_ISSUER.to_string(),
            sub: "admin".to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(&Header::default(), &claims, &auth.encoding_key).unwrap();

        assert!(matches!(auth.validate(&token), Err(AuthError::InvalidSubject)));
    }
}
