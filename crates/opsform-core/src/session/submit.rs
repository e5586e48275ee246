// ── Submit contract ──

use std::future::Future;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::context::SessionContext;
use crate::model::{ErrorMap, MessageKey, ValueSet};

/// What the backend said about a submitted value set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub ok: bool,
    /// Field-scoped errors, merged into the dialog's error map.
    #[serde(default)]
    pub server_errors: IndexMap<String, MessageKey>,
    /// Form-scoped banner message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageKey>,
}

impl SubmitOutcome {
    pub fn accepted() -> Self {
        Self {
            ok: true,
            ..Self::default()
        }
    }

    pub fn rejected(server_errors: IndexMap<String, MessageKey>) -> Self {
        Self {
            ok: false,
            server_errors,
            message: None,
        }
    }

    /// Failure with no field attribution (network error, 5xx, ...).
    pub fn failed(message: impl Into<MessageKey>) -> Self {
        Self {
            ok: false,
            server_errors: IndexMap::new(),
            message: Some(message.into()),
        }
    }
}

/// The persistence layer a dialog hands its snapshot to.
pub trait Submitter {
    fn submit(
        &self,
        values: ValueSet,
        context: &SessionContext,
    ) -> impl Future<Output = SubmitOutcome> + Send;
}

/// Proof that a submit is in flight; required to settle it.
#[derive(Debug)]
pub struct SubmitTicket {
    pub(crate) generation: u64,
    values: ValueSet,
}

impl SubmitTicket {
    pub(crate) fn new(generation: u64, values: ValueSet) -> Self {
        Self { generation, values }
    }

    /// The read-only snapshot to send.
    pub fn values(&self) -> &ValueSet {
        &self.values
    }
}

/// Result of asking to submit.
#[derive(Debug)]
pub enum SubmitGate {
    /// Validation passed; the dialog is now `Submitting`.
    Ready(SubmitTicket),
    /// Validation failed; the dialog is back to editing.
    Invalid(ErrorMap),
}

/// How a submit settled.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResolution {
    /// Local validation failed before anything was sent.
    Invalid(ErrorMap),
    /// Saved; the dialog is closed and these values were persisted.
    Accepted(ValueSet),
    /// Backend refused; the dialog is editable again.
    Rejected {
        errors: ErrorMap,
        form_error: Option<MessageKey>,
    },
    /// The dialog closed (or the ticket went stale) before the answer came.
    Discarded,
}

impl SubmitResolution {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}
