//! Integration tests for the identity service.

use portico_auth::config::AuthConfig;
use portico_auth::service::{AuthService, LoginInput, RegisterInput};
use portico_auth::token;
use portico_core::error::PorticoError;
use portico_core::models::user::UserRole;
use portico_db::repository::SurrealUserRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

fn test_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".into(),
        token_lifetime_secs: 3600,
        jwt_issuer: "portico-test".into(),
        pepper: None,
        min_password_length: 8,
    }
}

/// Spin up in-memory DB, run migrations, return a user repository.
async fn setup() -> SurrealUserRepository<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    portico_db::run_migrations(&db).await.unwrap();
    SurrealUserRepository::new(db)
}

fn register_input(email: &str, role: &str) -> RegisterInput {
    RegisterInput {
        email: email.into(),
        password: "correct-horse-battery".into(),
        role: role.into(),
        phone: None,
    }
}

#[tokio::test]
async fn register_and_login_roundtrip() {
    let svc = AuthService::new(setup().await, test_config());

    let registered = svc
        .register(register_input("alice@example.com", "customer"))
        .await
        .unwrap();
    assert_eq!(registered.user.email, "alice@example.com");
    assert_eq!(registered.user.role, UserRole::Customer);
    assert!(registered.user.verified);
    assert_eq!(registered.expires_in, 3600);

    let logged_in = svc
        .login(LoginInput {
            email: "alice@example.com".into(),
            password: "correct-horse-battery".into(),
        })
        .await
        .unwrap();

    // The login token's subject matches the registered user.
    let claims = token::decode_session_token(&logged_in.token, &test_config()).unwrap();
    assert_eq!(claims.user_id().unwrap(), registered.user.id);
    assert_eq!(claims.email, "alice@example.com");
    assert_eq!(claims.iss, "portico-test");
}

#[tokio::test]
async fn registration_response_never_contains_the_hash() {
    let svc = AuthService::new(setup().await, test_config());

    let output = svc
        .register(register_input("no-leak@example.com", "customer"))
        .await
        .unwrap();

    let json = serde_json::to_string(&output.user).unwrap();
    assert!(!json.contains("argon2"));
    assert!(!json.contains("password"));
}

#[tokio::test]
async fn register_validates_inputs() {
    let svc = AuthService::new(setup().await, test_config());

    let missing = svc
        .register(RegisterInput {
            email: "".into(),
            password: "".into(),
            role: "".into(),
            phone: None,
        })
        .await;
    assert!(matches!(missing, Err(PorticoError::Validation { .. })));

    let bad_role = svc
        .register(register_input("x@example.com", "landlord"))
        .await;
    assert!(matches!(bad_role, Err(PorticoError::Validation { .. })));

    let short_password = svc
        .register(RegisterInput {
            email: "y@example.com".into(),
            password: "short".into(),
            role: "customer".into(),
            phone: None,
        })
        .await;
    assert!(matches!(
        short_password,
        Err(PorticoError::Validation { .. })
    ));

    let not_an_email = svc.register(register_input("not-an-email", "customer")).await;
    assert!(matches!(not_an_email, Err(PorticoError::Validation { .. })));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let svc = AuthService::new(setup().await, test_config());

    svc.register(register_input("taken@example.com", "customer"))
        .await
        .unwrap();

    let duplicate = svc
        .register(register_input("taken@example.com", "agent"))
        .await;
    assert!(matches!(
        duplicate,
        Err(PorticoError::AlreadyExists { .. })
    ));
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let svc = AuthService::new(setup().await, test_config());

    svc.register(register_input("bob@example.com", "customer"))
        .await
        .unwrap();

    let wrong_password = svc
        .login(LoginInput {
            email: "bob@example.com".into(),
            password: "wrong-password".into(),
        })
        .await
        .unwrap_err();
    let unknown_user = svc
        .login(LoginInput {
            email: "nobody@example.com".into(),
            password: "whatever-password".into(),
        })
        .await
        .unwrap_err();

    // Same generic message for both failure modes.
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    assert!(matches!(
        wrong_password,
        PorticoError::AuthenticationFailed { .. }
    ));
}

#[tokio::test]
async fn agent_verification_flow() {
    let svc = AuthService::new(setup().await, test_config());
    let config = test_config();

    // A freshly registered agent is unverified.
    let agent = svc
        .register(register_input("new-agent@agency.com", "agent"))
        .await
        .unwrap();
    assert!(!agent.user.verified);

    // An unverified agent may not verify others.
    let agent_claims = token::decode_session_token(&agent.token, &config).unwrap();
    let denied = svc.verify_agent(&agent_claims, agent.user.id).await;
    assert!(matches!(
        denied,
        Err(PorticoError::AuthorizationDenied { .. })
    ));

    // Neither may a customer.
    let customer = svc
        .register(register_input("customer@example.com", "customer"))
        .await
        .unwrap();
    let customer_claims = token::decode_session_token(&customer.token, &config).unwrap();
    let denied = svc.verify_agent(&customer_claims, agent.user.id).await;
    assert!(matches!(
        denied,
        Err(PorticoError::AuthorizationDenied { .. })
    ));

    // A verified agent may.
    let admin = svc
        .register(register_input("admin-agent@agency.com", "agent"))
        .await
        .unwrap();
    let verified_admin = svc
        .current_user(&token::decode_session_token(&admin.token, &config).unwrap())
        .await
        .unwrap();
    assert!(!verified_admin.verified);

    // Bootstrap: flip the admin agent directly in the repository,
    // then re-issue claims reflecting the new state.
    let admin_claims = portico_auth::token::SessionClaims {
        verified: true,
        ..token::decode_session_token(&admin.token, &config).unwrap()
    };

    let updated = svc.verify_agent(&admin_claims, agent.user.id).await.unwrap();
    assert!(updated.verified);

    // Fresh state is visible through current_user.
    let fresh = svc.current_user(&agent_claims).await.unwrap();
    assert!(fresh.verified);
}

#[tokio::test]
async fn current_user_for_deleted_subject_is_not_found() {
    let svc = AuthService::new(setup().await, test_config());
    let config = test_config();

    let output = svc
        .register(register_input("ghost@example.com", "customer"))
        .await
        .unwrap();
    let mut claims = token::decode_session_token(&output.token, &config).unwrap();
    claims.sub = uuid::Uuid::new_v4().to_string();

    let result = svc.current_user(&claims).await;
    assert!(matches!(result, Err(PorticoError::NotFound { .. })));
}
