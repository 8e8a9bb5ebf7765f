//! Identity service — registration, login, and agent verification.

use portico_core::error::{PorticoError, PorticoResult};
use portico_core::models::user::{CreateUser, PublicUser, UserRole};
use portico_core::repository::UserRepository;
use tracing::info;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token::{self, SessionClaims};

/// Input for the registration flow. `role` is the raw wire value and
/// is validated here.
#[derive(Debug)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub role: String,
    pub phone: Option<String>,
}

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Result of a successful register or login.
#[derive(Debug)]
pub struct SessionOutput {
    /// Signed session token.
    pub token: String,
    /// Public projection of the user — never carries the hash.
    pub user: PublicUser,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

/// Identity service.
///
/// Generic over the user repository so that the auth layer has no
/// dependency on the database crate.
pub struct AuthService<U: UserRepository> {
    user_repo: U,
    config: AuthConfig,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: U, config: AuthConfig) -> Self {
        Self { user_repo, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Register a new user and issue a session token.
    ///
    /// Agents start unverified; customers start verified.
    pub async fn register(&self, input: RegisterInput) -> PorticoResult<SessionOutput> {
        info!(email = %input.email, role = %input.role, "register request");

        if input.email.is_empty() || input.password.is_empty() || input.role.is_empty() {
            return Err(PorticoError::Validation {
                message: "email, password, and role are required".into(),
            });
        }
        if !input.email.contains('@') {
            return Err(PorticoError::Validation {
                message: "email is malformed".into(),
            });
        }
        if input.password.len() < self.config.min_password_length {
            return Err(PorticoError::Validation {
                message: format!(
                    "password must be at least {} characters",
                    self.config.min_password_length
                ),
            });
        }
        let role = UserRole::parse(&input.role).ok_or_else(|| PorticoError::Validation {
            message: "role must be customer or agent".into(),
        })?;

        // Duplicate email check. Any hit is a conflict; only a clean
        // NotFound lets registration proceed.
        match self.user_repo.get_by_email(&input.email).await {
            Ok(_) => {
                return Err(PorticoError::AlreadyExists {
                    entity: format!("user with email {}", input.email),
                });
            }
            Err(PorticoError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let user = self
            .user_repo
            .create(CreateUser {
                email: input.email,
                password: input.password,
                role,
                phone: input.phone,
            })
            .await?;

        let token = token::issue_session_token(&user, &self.config)?;

        Ok(SessionOutput {
            token,
            user: user.into(),
            expires_in: self.config.token_lifetime_secs,
        })
    }

    /// Authenticate with email + password and issue a session token.
    ///
    /// Fails with a generic "invalid credentials" error for both an
    /// unknown email and a wrong password.
    pub async fn login(&self, input: LoginInput) -> PorticoResult<SessionOutput> {
        info!(email = %input.email, "login request");

        let user = self
            .user_repo
            .get_by_email(&input.email)
            .await
            .map_err(|e| match e {
                PorticoError::NotFound { .. } => AuthError::InvalidCredentials.into(),
                other => other,
            })?;

        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = token::issue_session_token(&user, &self.config)?;

        Ok(SessionOutput {
            token,
            user: user.into(),
            expires_in: self.config.token_lifetime_secs,
        })
    }

    /// Resolve the current user from validated claims, re-querying
    /// the database for fresh state.
    pub async fn current_user(&self, claims: &SessionClaims) -> PorticoResult<PublicUser> {
        let id = claims.user_id()?;
        let user = self.user_repo.get_by_id(id).await?;
        Ok(user.into())
    }

    /// Mark an agent as verified.
    ///
    /// The caller must themselves be a verified agent; the target
    /// must be an agent, or the operation fails with `NotFound`.
    pub async fn verify_agent(
        &self,
        claims: &SessionClaims,
        target_id: Uuid,
    ) -> PorticoResult<PublicUser> {
        if claims.role != UserRole::Agent || !claims.verified {
            return Err(PorticoError::AuthorizationDenied {
                reason: "only a verified agent may verify agents".into(),
            });
        }

        info!(target = %target_id, by = %claims.sub, "verifying agent");
        let user = self.user_repo.mark_agent_verified(target_id).await?;
        Ok(user.into())
    }
}
