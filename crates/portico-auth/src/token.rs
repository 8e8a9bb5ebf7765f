//! Session-token (JWT) issuance and verification.
//!
//! Tokens are HS256-signed with a shared secret and carry the user's
//! identity and role for one hour. Validation is purely stateless:
//! the `verified` claim reflects the user's state at issuance and is
//! not re-checked against the database unless a handler re-queries.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use portico_core::models::user::{User, UserRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// JWT claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject — user ID (UUID string).
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    /// Verification state at issuance; may be stale.
    pub verified: bool,
    /// Issuer.
    pub iss: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Unique token ID (UUID string).
    pub jti: String,
}

impl SessionClaims {
    /// The subject parsed back to a UUID.
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub)
            .map_err(|e| AuthError::TokenInvalid(format!("bad subject: {e}")))
    }
}

/// Issue a signed HS256 session token for a user.
pub fn issue_session_token(user: &User, config: &AuthConfig) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = SessionClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        verified: user.verified,
        iss: config.jwt_issuer.clone(),
        iat: now,
        exp: now + config.token_lifetime_secs as i64,
        jti: Uuid::new_v4().to_string(),
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    let header = Header::new(Algorithm::HS256);
    jsonwebtoken::encode(&header, &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify an HS256 session token.
pub fn decode_session_token(
    token: &str,
    config: &AuthConfig,
) -> Result<SessionClaims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

    jsonwebtoken::decode::<SessionClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

/// Validated session claims — a newtype proving the token was
/// verified.
///
/// Used by the API layer to extract authenticated context from
/// incoming requests.
#[derive(Debug, Clone)]
pub struct ValidatedClaims(pub SessionClaims);

/// Validate a session token (signature, expiry, issuer) and return
/// the verified claims.
///
/// This is the entry point for request-level authentication
/// middleware. No database lookup is performed.
pub fn validate_session_token(
    token: &str,
    config: &AuthConfig,
) -> Result<ValidatedClaims, AuthError> {
    decode_session_token(token, config).map(ValidatedClaims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".into(),
            token_lifetime_secs: 3600,
            jwt_issuer: "portico-test".into(),
            ..Default::default()
        }
    }

    fn test_user(role: UserRole, verified: bool) -> User {
        User {
            id: Uuid::new_v4(),
            email: "alice@example.com".into(),
            phone: None,
            password_hash: "$argon2id$irrelevant".into(),
            role,
            verified,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_roundtrip() {
        let config = test_config();
        let user = test_user(UserRole::Agent, false);

        let token = issue_session_token(&user, &config).unwrap();
        let claims = decode_session_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, UserRole::Agent);
        assert!(!claims.verified);
        assert_eq!(claims.iss, "portico-test");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = test_config();
        let user = test_user(UserRole::Customer, true);
        let token = issue_session_token(&user, &config).unwrap();

        let other = AuthConfig {
            jwt_secret: "other-secret".into(),
            ..test_config()
        };
        assert!(matches!(
            decode_session_token(&token, &other),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let config = test_config();
        let user = test_user(UserRole::Customer, true);
        let token = issue_session_token(&user, &config).unwrap();

        let other = AuthConfig {
            jwt_issuer: "someone-else".into(),
            ..test_config()
        };
        assert!(decode_session_token(&token, &other).is_err());
    }

    #[test]
    fn jti_is_unique() {
        let config = test_config();
        let user = test_user(UserRole::Customer, true);

        let c1 = decode_session_token(&issue_session_token(&user, &config).unwrap(), &config)
            .unwrap();
        let c2 = decode_session_token(&issue_session_token(&user, &config).unwrap(), &config)
            .unwrap();
        assert_ne!(c1.jti, c2.jti);
    }
}
