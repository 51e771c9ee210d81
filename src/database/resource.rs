use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, FromRow};

use crate::database::manager::{ConstraintKind, DatabaseError};
use crate::database::models::ValidationError;
use crate::database::query_builder::SqlQuery;
use crate::error::ApiError;
use crate::types::Operation;

pub const UNIQUE_FALLBACK: &str = "Data unik sudah ada.";
pub const RELATION_FALLBACK: &str = "Data terkait tidak ditemukan.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    NotFound,
    Conflict,
}

/// Client-facing meaning of one named store constraint.
#[derive(Debug)]
pub struct ConstraintRule {
    pub constraint: &'static str,
    pub outcome: RuleOutcome,
    pub message: &'static str,
    pub update_message: Option<&'static str>,
}

impl ConstraintRule {
    pub const fn conflict(constraint: &'static str, message: &'static str) -> Self {
        Self { constraint, outcome: RuleOutcome::Conflict, message, update_message: None }
    }

    pub const fn not_found(constraint: &'static str, message: &'static str) -> Self {
        Self { constraint, outcome: RuleOutcome::NotFound, message, update_message: None }
    }

    /// Wording used instead of `message` when the violation comes from an update.
    pub const fn on_update(self, message: &'static str) -> Self {
        Self { update_message: Some(message), ..self }
    }

    fn message_for(&self, op: Operation) -> &'static str {
        match (op, self.update_message) {
            (Operation::Update, Some(message)) => message,
            _ => self.message,
        }
    }
}

/// Query-string parameter that narrows a list to one parent row.
#[derive(Debug)]
pub struct ParentFilter {
    pub param: &'static str,
    pub column: &'static str,
}

/// A table exposed through the uniform list/show/delete contract.
pub trait Resource: Send + Sync + 'static {
    type Record: for<'r> FromRow<'r, PgRow> + Serialize + Send + Unpin;

    const TABLE: &'static str;
    /// Alias-qualified key column inside `SELECT`, e.g. `a.id`.
    const ID_COLUMN: &'static str;
    /// `SELECT ... FROM ... LEFT JOIN ...` with no WHERE or ORDER BY.
    const SELECT: &'static str;
    const SEARCH_COLUMNS: &'static [&'static str];
    const PARENT_FILTER: Option<ParentFilter> = None;
    /// Always ends with the key column so ties have a stable order.
    const ORDER_BY: &'static [&'static str];

    const NOT_FOUND: &'static str;
    const DELETED: &'static str;
    /// Returned when dependents block a delete.
    const DELETE_BLOCKED: &'static str;
    const CONSTRAINTS: &'static [ConstraintRule] = &[];
}

/// A resource whose rows are created and updated through a validated JSON payload.
pub trait Writable: Resource {
    type Payload: DeserializeOwned + Send + 'static;

    const CREATED: &'static str;
    const UPDATED: &'static str;

    /// `INSERT ... RETURNING id`. `actor` is the authenticated kader.
    fn insert(payload: Self::Payload, actor: i32) -> Result<SqlQuery, ValidationError>;

    fn update(id: i32, payload: Self::Payload, actor: i32) -> Result<SqlQuery, ValidationError>;
}

/// Translate a failed write on `R` into the response the client should see.
pub fn write_error<R: Resource>(err: DatabaseError, op: Operation) -> ApiError {
    let violation = match err {
        DatabaseError::Constraint(violation) => violation,
        other => return other.into(),
    };

    if op != Operation::Delete {
        if let Some(rule) = violation
            .constraint
            .as_deref()
            .and_then(|name| R::CONSTRAINTS.iter().find(|rule| rule.constraint == name))
        {
            let message = rule.message_for(op);
            return match rule.outcome {
                RuleOutcome::NotFound => ApiError::not_found(message),
                RuleOutcome::Conflict => ApiError::conflict(message),
            };
        }
    }

    tracing::warn!(
        "{:?} on {} hit constraint {:?} ({:?})",
        op,
        R::TABLE,
        violation.constraint,
        violation.kind
    );

    match (violation.kind, op) {
        (ConstraintKind::ForeignKey, Operation::Delete) => ApiError::conflict(R::DELETE_BLOCKED),
        (ConstraintKind::ForeignKey, _) => ApiError::not_found(RELATION_FALLBACK),
        (ConstraintKind::Unique, _) => ApiError::conflict(UNIQUE_FALLBACK),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::manager::ConstraintViolation;
    use crate::database::models::anak::Anak;
    use crate::database::models::ibu::Ibu;

    fn violation(kind: ConstraintKind, name: &str) -> DatabaseError {
        DatabaseError::Constraint(ConstraintViolation {
            kind,
            constraint: Some(name.to_string()),
        })
    }

    #[test]
    fn duplicate_nik_is_conflict() {
        let err = write_error::<Ibu>(violation(ConstraintKind::Unique, "ibu_nik_key"), Operation::Create);
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.message(), "NIK ini sudah terdaftar.");
    }

    #[test]
    fn update_uses_its_own_wording() {
        let err = write_error::<Ibu>(violation(ConstraintKind::Unique, "ibu_nik_key"), Operation::Update);
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.message(), "NIK ini sudah terdaftar pada ibu lain.");
    }

    #[test]
    fn missing_parent_is_not_found() {
        let err = write_error::<Anak>(violation(ConstraintKind::ForeignKey, "anak_id_ibu_fkey"), Operation::Create);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "ID Ibu tidak ditemukan.");
    }

    #[test]
    fn delete_blocked_by_dependents_is_conflict() {
        // The constraint that fires belongs to the child table.
        let err = write_error::<Ibu>(violation(ConstraintKind::ForeignKey, "anak_id_ibu_fkey"), Operation::Delete);
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.message(), Ibu::DELETE_BLOCKED);
    }

    #[test]
    fn unknown_constraints_fall_back() {
        let err = write_error::<Ibu>(violation(ConstraintKind::Unique, "ibu_other_key"), Operation::Create);
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.message(), UNIQUE_FALLBACK);

        let err = write_error::<Ibu>(violation(ConstraintKind::ForeignKey, "ibu_other_fkey"), Operation::Update);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), RELATION_FALLBACK);
    }

    #[test]
    fn other_errors_are_internal() {
        let err = write_error::<Ibu>(DatabaseError::QueryError("syntax".into()), Operation::Create);
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn missing_row_is_not_found() {
        let err = write_error::<Ibu>(DatabaseError::NotFound(Ibu::NOT_FOUND.into()), Operation::Delete);
        assert_eq!(err.status_code(), 404);
    }
}
