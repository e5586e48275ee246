// ── Core error types ──
//
// Two families: `SchemaError` is a programming mistake in the static
// field/rule tables and is raised at registration time; `SessionError`
// is misuse of a dialog instance (editing a closed dialog, re-entering
// submit). Validation failures are not errors here -- they are data,
// carried in an `ErrorMap`.

use thiserror::Error;

use crate::model::EntityKind;

/// Configuration error in an entity's descriptor or rule table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("{entity}: duplicate field '{field}'")]
    DuplicateField { entity: EntityKind, field: String },

    #[error("{entity}: rule {role} references unknown field '{field}'")]
    UnknownField {
        entity: EntityKind,
        field: String,
        role: &'static str,
    },

    #[error("{entity}: rule references unknown session flag '{flag}'")]
    UnknownFlag { entity: EntityKind, flag: String },

    #[error("{entity}: rule targets '{field}', which holds no value")]
    ValuelessTarget { entity: EntityKind, field: String },

    #[error("{entity}: field '{field}' lists option value '{value}' more than once")]
    DuplicateOption {
        entity: EntityKind,
        field: String,
        value: String,
    },

    #[error("{entity}: field '{field}' has an invalid pattern: {reason}")]
    InvalidPattern {
        entity: EntityKind,
        field: String,
        reason: String,
    },

    #[error("entity '{entity}' is already registered")]
    DuplicateEntity { entity: EntityKind },

    #[error("entity '{entity}' is not registered")]
    UnknownEntity { entity: EntityKind },
}

/// Misuse of a form session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("dialog is closed")]
    Closed,

    #[error("a submit is already in flight")]
    SubmitInFlight,

    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    #[error("field '{field}' does not hold a value")]
    NotEditable { field: String },
}
