//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    portico_db::run_migrations(&db).await.unwrap();

    // Verify that the tables exist by querying INFO FOR DB.
    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: surrealdb::Value = result.take(0).unwrap();
    let info_str = format!("{info:?}");

    assert!(info_str.contains("user"), "missing user table");
    assert!(info_str.contains("listing"), "missing listing table");
    assert!(
        info_str.contains("communication"),
        "missing communication table"
    );

    // Verify migration was recorded.
    assert!(info_str.contains("_migration"), "missing _migration table");
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    // Run twice — should not fail.
    portico_db::run_migrations(&db).await.unwrap();
    portico_db::run_migrations(&db).await.unwrap();

    // Verify only one migration record exists.
    #[derive(serde::Deserialize)]
    struct MigrationRow {
        #[allow(dead_code)]
        version: u32,
    }
    let mut result = db.query("SELECT version FROM _migration").await.unwrap();
    let records: Vec<MigrationRow> = result.take(0).unwrap();
    assert_eq!(records.len(), 1, "expected exactly one migration record");
}

#[tokio::test]
async fn can_create_record_after_migration() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    portico_db::run_migrations(&db).await.unwrap();

    db.query(
        "CREATE user SET \
         email = 'probe@example.com', \
         phone = NONE, \
         password_hash = 'x', \
         role = 'customer', \
         verified = true",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    #[derive(serde::Deserialize)]
    struct EmailRow {
        email: String,
    }
    let mut result = db
        .query("SELECT email FROM user WHERE email = 'probe@example.com'")
        .await
        .unwrap();
    let records: Vec<EmailRow> = result.take(0).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].email, "probe@example.com");
}

#[tokio::test]
async fn unique_index_prevents_duplicate_emails() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    portico_db::run_migrations(&db).await.unwrap();

    db.query(
        "CREATE user SET \
         email = 'dup@example.com', \
         phone = NONE, \
         password_hash = 'x', \
         role = 'customer', \
         verified = true",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    // Attempt duplicate email — should fail.
    let result = db
        .query(
            "CREATE user SET \
             email = 'dup@example.com', \
             phone = NONE, \
             password_hash = 'y', \
             role = 'agent', \
             verified = false",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "duplicate email should be rejected");
}

#[tokio::test]
async fn role_assert_rejects_unknown_roles() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    portico_db::run_migrations(&db).await.unwrap();

    let result = db
        .query(
            "CREATE user SET \
             email = 'odd@example.com', \
             phone = NONE, \
             password_hash = 'x', \
             role = 'landlord', \
             verified = false",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "unknown role should be rejected");
}
