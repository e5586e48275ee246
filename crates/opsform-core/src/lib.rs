//! Declarative conditional form engine behind the admin console's entity
//! dialogs.
//!
//! Every dialog (site, SSID, device, portal, voucher, ...) is described as
//! data: an ordered list of [`FieldDescriptor`]s plus a list of
//! [`ConditionalRule`]s linking one field's requiredness or value to
//! another field's current value. The crate turns those tables into
//! behaviour:
//!
//! - **[`SchemaRegistry`]**: Compiles and holds one [`EntitySchema`] per
//!   [`EntityKind`], rejecting broken tables at registration.
//!
//! - **[`resolve()`]**: Projects raw lookup records into a descriptor's
//!   option list. Pure and idempotent.
//!
//! - **[`evaluate()`]**: Computes required/visible state and pending resets
//!   for a value set. Single generation, never mutates.
//!
//! - **[`EntitySchema::validate`]**: Produces an [`ErrorMap`] of message
//!   keys; empty means valid.
//!
//! - **[`FormSession`]**: One open dialog: owns the value set, settles
//!   reset cascades on every change, and gates submission through a
//!   [`Submitter`].
//!
//! The engine emits only [`MessageKey`]s. Display strings come from a
//! [`MessageCatalog`] supplied by the caller.

pub mod context;
pub mod entities;
pub mod error;
pub mod evaluate;
pub mod model;
pub mod registry;
pub mod resolve;
pub mod schema;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use context::{DialogMode, SessionContext, flags};
pub use entities::builtin_registry;
pub use error::{SchemaError, SessionError};
pub use evaluate::{Evaluation, FieldState, evaluate};
pub use registry::SchemaRegistry;
pub use resolve::{LookupResult, Projection, project, resolve};
pub use schema::{EntitySchema, ResolvedOptions, compile};
pub use session::{
    DEFAULT_DEBOUNCE, FormSession, FormState, Liveness, LookupTicket, SubmitGate, SubmitOutcome,
    SubmitResolution, SubmitTicket, Submitter,
};

pub use model::{
    ConditionalRule, Constraint, Effect, EntityKind, ErrorMap, FieldDescriptor, FieldKind,
    FieldOption, FieldValue, Format, Layout, MessageCatalog, MessageKey, OptionLabel, Predicate,
    RuleCondition, Subject, ValueSet, keys, when, when_flag,
};
