//! Authentication configuration.

/// Configuration for the identity service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared secret for HS256 session-token signing.
    pub jwt_secret: String,
    /// Session token lifetime in seconds (default: 3600 = 1 hour).
    pub token_lifetime_secs: u64,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Optional pepper prepended to passwords before Argon2id hashing
    /// and verification.
    pub pepper: Option<String>,
    /// Minimum password length for policy enforcement.
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_lifetime_secs: 3600,
            jwt_issuer: "portico".into(),
            pepper: None,
            min_password_length: 8,
        }
    }
}
