//! Embedded PostgreSQL helpers shared by the repository suites.
//!
//! - Database reset uses `postgres` so `DROP DATABASE` runs outside any
//!   Diesel transaction.
//! - Schema setup runs the embedded Diesel migrations so test schemas never
//!   drift from production.
//! - Seed helpers insert rows the repositories under test only read.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};

use super::format_postgres_error;

/// Embedded migrations from the backend/migrations directory.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Drop and recreate `name` so every suite starts from an empty database.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let admin_url = cluster.connection().database_url("postgres");
    let mut client = Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let escaped = name.replace('"', "\"\"");
    client
        .batch_execute(&format!(r#"DROP DATABASE IF EXISTS "{escaped}" WITH (FORCE)"#))
        .map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!(r#"CREATE DATABASE "{escaped}""#))
        .map_err(|err| format_postgres_error(&err))
}

/// Runs all pending Diesel migrations against the test database.
pub fn migrate_schema(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("migration: {err}"))?;
    Ok(())
}

/// Insert a tag and return its id.
pub fn seed_tag(url: &str, name: &str, slug: &str) -> Result<i64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let row = client
        .query_one(
            "INSERT INTO tags (name, slug) VALUES ($1, $2) RETURNING id",
            &[&name, &slug],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}

/// Insert an ingredient and return its id.
pub fn seed_ingredient(url: &str, name: &str, unit: &str) -> Result<i64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let row = client
        .query_one(
            "INSERT INTO ingredients (name, measurement_unit) VALUES ($1, $2) RETURNING id",
            &[&name, &unit],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}

/// Insert a user with a placeholder hash and return its id.
pub fn seed_user(url: &str, username: &str) -> Result<i64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let email = format!("{username}@foodgram.test");
    let row = client
        .query_one(
            concat!(
                "INSERT INTO users (email, username, first_name, last_name, password_hash) ",
                "VALUES ($1, $2, 'Test', 'Cook', 'not-a-hash') RETURNING id"
            ),
            &[&email, &username],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}

/// Run a raw statement, used to simulate schema loss.
pub fn execute(url: &str, sql: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(sql)
        .map_err(|err| format_postgres_error(&err))
}
