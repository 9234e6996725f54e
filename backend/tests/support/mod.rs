//! Shared helpers for the backend integration suites.
//!
//! Each file under `backend/tests/` is its own crate, so suites declare
//! `mod support;` and use whichever helpers they need.

#![allow(dead_code, reason = "each suite uses a different subset of helpers")]

pub mod embedded_postgres;
pub mod pg_embed;

pub use embedded_postgres::{migrate_schema, reset_database};

/// Whether `SKIP_TEST_CLUSTER` is set to `1`, `true` or `yes`.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .is_ok_and(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Skip with a marker when `SKIP_TEST_CLUSTER` is set, otherwise fail loudly
/// so a broken cluster never passes silently in CI.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        return None;
    }
    panic!("embedded cluster setup failed: {reason} (set SKIP_TEST_CLUSTER=1 to skip)");
}

/// Render a `postgres` error with its SQLSTATE, detail and hint, which the
/// plain `Display` output collapses to `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db) = error.as_db_error() else {
        return error.to_string();
    };
    let mut summary = format!("postgres error {:?}: {}", db.code(), db.message());
    if let Some(detail) = db.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    if let Some(hint) = db.hint() {
        summary.push_str("; hint: ");
        summary.push_str(hint);
    }
    summary
}
