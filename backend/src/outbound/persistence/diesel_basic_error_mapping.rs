//! Shared Diesel error mapping for the repositories.
//!
//! [`map_basic_diesel_error`] covers the query/connection split every adapter
//! needs. Adapters that translate integrity failures into port variants first
//! ask [`constraint_violation`] which constraint fired.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, warn};

use super::pool::PoolError;

/// Integrity constraint classes the adapters translate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViolationKind {
    Unique,
    ForeignKey,
    Check,
}

/// Integrity failure reported by PostgreSQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConstraintViolation {
    pub kind: ViolationKind,
    pub constraint: Option<String>,
}

impl ConstraintViolation {
    /// Whether the violated constraint is `name`.
    pub fn is(&self, kind: ViolationKind, name: &str) -> bool {
        self.kind == kind && self.constraint.as_deref() == Some(name)
    }
}

/// Classify `error` as an integrity violation, if it is one.
pub(crate) fn constraint_violation(error: &DieselError) -> Option<ConstraintViolation> {
    let DieselError::DatabaseError(kind, info) = error else {
        return None;
    };
    let kind = match kind {
        DatabaseErrorKind::UniqueViolation => ViolationKind::Unique,
        DatabaseErrorKind::ForeignKeyViolation => ViolationKind::ForeignKey,
        DatabaseErrorKind::CheckViolation => ViolationKind::Check,
        _ => return None,
    };
    Some(ConstraintViolation {
        kind,
        constraint: info.constraint_name().map(str::to_owned),
    })
}

/// Log a constraint violation no adapter mapping recognised.
pub(crate) fn warn_unmapped_violation(violation: &ConstraintViolation) {
    warn!(
        kind = ?violation.kind,
        constraint = ?violation.constraint,
        "unrecognised constraint violation - may need specific error mapping"
    );
}

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// `NotFound` and query-builder failures map to query errors; a closed
/// connection maps to a connection error.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query("foreign key violation")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

/// Escape `LIKE` wildcards so `value` matches literally.
pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
