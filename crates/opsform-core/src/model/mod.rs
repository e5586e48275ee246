// ── Domain model ──
//
// Descriptors, rules, values and error maps shared by the evaluator,
// the schema compiler and the form session.

pub mod entity_kind;
pub mod error_map;
pub mod field;
pub mod message;
pub mod rule;
pub mod value;

pub use entity_kind::EntityKind;
pub use error_map::ErrorMap;
pub use field::{
    Constraint, FieldDescriptor, FieldKind, FieldOption, Format, Layout, OptionLabel,
};
pub use message::{MessageCatalog, MessageKey, keys};
pub use rule::{ConditionalRule, Effect, Predicate, RuleCondition, Subject, when, when_flag};
pub use value::{FieldValue, ValueSet};
