//! Integration tests for the User repository using in-memory SurrealDB.

use portico_core::error::PorticoError;
use portico_core::models::user::{CreateUser, UserRole};
use portico_core::repository::UserRepository;
use portico_db::repository::SurrealUserRepository;
use portico_db::verify_password;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    portico_db::run_migrations(&db).await.unwrap();
    db
}

#[tokio::test]
async fn create_and_get_customer() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(CreateUser {
            email: "alice@example.com".into(),
            password: "SuperSecret123!".into(),
            role: UserRole::Customer,
            phone: Some("+15550001111".into()),
        })
        .await
        .unwrap();

    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.role, UserRole::Customer);
    // Customers are verified from the start.
    assert!(user.verified);

    // Password should be hashed, not stored in plaintext.
    assert_ne!(user.password_hash, "SuperSecret123!");
    assert!(user.password_hash.starts_with("$argon2id$"));

    // Get by ID should return the same user.
    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.email, "alice@example.com");
    assert_eq!(fetched.phone.as_deref(), Some("+15550001111"));
}

#[tokio::test]
async fn agents_start_unverified() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let agent = repo
        .create(CreateUser {
            email: "bob@agency.com".into(),
            password: "MyPassword42!".into(),
            role: UserRole::Agent,
            phone: Some("+15550002222".into()),
        })
        .await
        .unwrap();

    assert_eq!(agent.role, UserRole::Agent);
    assert!(!agent.verified);
}

#[tokio::test]
async fn password_verification() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(CreateUser {
            email: "bob@example.com".into(),
            password: "MyPassword42!".into(),
            role: UserRole::Customer,
            phone: None,
        })
        .await
        .unwrap();

    // Correct password should verify.
    assert!(verify_password("MyPassword42!", &user.password_hash, None).unwrap());

    // Wrong password should not verify.
    assert!(!verify_password("wrong", &user.password_hash, None).unwrap());
}

#[tokio::test]
async fn pepper_changes_the_hash_input() {
    let db = setup().await;
    let repo = SurrealUserRepository::with_pepper(db, "server-pepper".into());

    let user = repo
        .create(CreateUser {
            email: "peppered@example.com".into(),
            password: "MyPassword42!".into(),
            role: UserRole::Customer,
            phone: None,
        })
        .await
        .unwrap();

    assert!(verify_password("MyPassword42!", &user.password_hash, Some("server-pepper")).unwrap());
    assert!(!verify_password("MyPassword42!", &user.password_hash, None).unwrap());
}

#[tokio::test]
async fn get_by_email_and_phone() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(CreateUser {
            email: "carol@example.com".into(),
            password: "Password123!".into(),
            role: UserRole::Agent,
            phone: Some("+15550003333".into()),
        })
        .await
        .unwrap();

    let by_email = repo.get_by_email("carol@example.com").await.unwrap();
    assert_eq!(by_email.id, user.id);

    let by_phone = repo.get_by_phone("+15550003333").await.unwrap();
    assert_eq!(by_phone.id, user.id);

    let missing = repo.get_by_email("nobody@example.com").await;
    assert!(matches!(missing, Err(PorticoError::NotFound { .. })));
}

#[tokio::test]
async fn mark_agent_verified_flips_the_flag() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let agent = repo
        .create(CreateUser {
            email: "dave@agency.com".into(),
            password: "Password123!".into(),
            role: UserRole::Agent,
            phone: None,
        })
        .await
        .unwrap();
    assert!(!agent.verified);

    let updated = repo.mark_agent_verified(agent.id).await.unwrap();
    assert!(updated.verified);

    let fetched = repo.get_by_id(agent.id).await.unwrap();
    assert!(fetched.verified);
}

#[tokio::test]
async fn mark_agent_verified_rejects_customers_and_unknown_ids() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let customer = repo
        .create(CreateUser {
            email: "eve@example.com".into(),
            password: "Password123!".into(),
            role: UserRole::Customer,
            phone: None,
        })
        .await
        .unwrap();

    // A customer is not an agent — NotFound, and the row is untouched.
    let result = repo.mark_agent_verified(customer.id).await;
    assert!(matches!(result, Err(PorticoError::NotFound { .. })));

    let result = repo.mark_agent_verified(uuid::Uuid::new_v4()).await;
    assert!(matches!(result, Err(PorticoError::NotFound { .. })));
}
