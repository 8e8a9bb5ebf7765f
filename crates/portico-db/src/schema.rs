//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, Deserialize)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD phone ON TABLE user TYPE option<string>;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['customer', 'agent'];
DEFINE FIELD verified ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_phone ON TABLE user COLUMNS phone;

-- =======================================================================
-- Listings
-- =======================================================================
DEFINE TABLE listing SCHEMAFULL;
DEFINE FIELD title ON TABLE listing TYPE string;
DEFINE FIELD price ON TABLE listing TYPE float;
DEFINE FIELD location ON TABLE listing TYPE string;
DEFINE FIELD description ON TABLE listing TYPE string;
DEFINE FIELD agent_id ON TABLE listing TYPE string;
DEFINE FIELD created_at ON TABLE listing TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_listing_agent ON TABLE listing COLUMNS agent_id;

-- =======================================================================
-- Communications (append-mostly; only status is mutated, by webhooks)
-- =======================================================================
DEFINE TABLE communication SCHEMAFULL;
DEFINE FIELD listing_id ON TABLE communication TYPE option<string>;
DEFINE FIELD user_id ON TABLE communication TYPE option<string>;
DEFINE FIELD agent_id ON TABLE communication TYPE option<string>;
DEFINE FIELD channel ON TABLE communication TYPE string \
    ASSERT $value IN ['call', 'chat-message', 'email'];
DEFINE FIELD status ON TABLE communication TYPE string;
DEFINE FIELD virtual_address ON TABLE communication TYPE option<string>;
DEFINE FIELD contact_email ON TABLE communication TYPE option<string>;
DEFINE FIELD message ON TABLE communication TYPE option<string>;
DEFINE FIELD created_at ON TABLE communication TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_comm_address_channel ON TABLE communication \
    COLUMNS virtual_address, channel;
";

/// Apply any pending migrations, in version order.
///
/// Safe to call on every startup: applied versions are recorded in
/// the `_migration` table and skipped on subsequent runs.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
