// ── Conditional rules ──
//
// Declarative dependencies linking one field's requiredness (or value)
// to another field's current value, or to a session flag such as
// edit mode. Rule order is significant: for a given target the last
// matching rule wins.

use std::fmt;

use super::value::FieldValue;

// ── Subject ─────────────────────────────────────────────────────────

/// What a rule inspects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    /// A sibling field of the same entity.
    Field(String),
    /// A synthetic flag supplied by the `SessionContext` (see
    /// [`crate::context::flags`]).
    Flag(String),
}

impl Subject {
    pub fn name(&self) -> &str {
        match self {
            Self::Field(name) | Self::Flag(name) => name,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Flag(name) => write!(f, "@{name}"),
        }
    }
}

// ── Predicate ───────────────────────────────────────────────────────

/// Pure test applied to the controlling value.
///
/// Equality-based variants compare with [`FieldValue::loose_eq`].
#[derive(Debug, Clone)]
pub enum Predicate {
    Equals(FieldValue),
    NotEquals(FieldValue),
    OneOf(Vec<FieldValue>),
    NoneOf(Vec<FieldValue>),
    Truthy,
    Falsy,
    Empty,
    NotEmpty,
    /// Escape hatch for conditions the closed variants can't express.
    Custom {
        name: &'static str,
        test: fn(&FieldValue) -> bool,
    },
}

impl Predicate {
    pub fn equals(value: impl Into<FieldValue>) -> Self {
        Self::Equals(value.into())
    }

    pub fn not_equals(value: impl Into<FieldValue>) -> Self {
        Self::NotEquals(value.into())
    }

    pub fn one_of<V: Into<FieldValue>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::OneOf(values.into_iter().map(Into::into).collect())
    }

    pub fn none_of<V: Into<FieldValue>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::NoneOf(values.into_iter().map(Into::into).collect())
    }

    pub fn test(&self, value: &FieldValue) -> bool {
        match self {
            Self::Equals(expected) => value.loose_eq(expected),
            Self::NotEquals(expected) => !value.loose_eq(expected),
            Self::OneOf(candidates) => candidates.iter().any(|c| value.loose_eq(c)),
            Self::NoneOf(candidates) => !candidates.iter().any(|c| value.loose_eq(c)),
            Self::Truthy => value.is_truthy(),
            Self::Falsy => !value.is_truthy(),
            Self::Empty => value.is_empty(),
            Self::NotEmpty => !value.is_empty(),
            Self::Custom { test, .. } => test(value),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |values: &[FieldValue]| {
            values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            Self::Equals(v) => write!(f, "== {v}"),
            Self::NotEquals(v) => write!(f, "!= {v}"),
            Self::OneOf(vs) => write!(f, "in [{}]", join(vs)),
            Self::NoneOf(vs) => write!(f, "not in [{}]", join(vs)),
            Self::Truthy => f.write_str("is truthy"),
            Self::Falsy => f.write_str("is falsy"),
            Self::Empty => f.write_str("is empty"),
            Self::NotEmpty => f.write_str("is not empty"),
            Self::Custom { name, .. } => write!(f, "{name}()"),
        }
    }
}

// ── Effect ──────────────────────────────────────────────────────────

/// What a matching rule does to its target.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Require,
    Optional,
    /// Field no longer applies; clear it to its kind's empty value.
    ResetToEmpty,
    /// Field no longer applies; put it back to a fixed value.
    ResetToDefault(FieldValue),
}

impl Effect {
    pub fn is_reset(&self) -> bool {
        matches!(self, Self::ResetToEmpty | Self::ResetToDefault(_))
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Require => f.write_str("require"),
            Self::Optional => f.write_str("optional"),
            Self::ResetToEmpty => f.write_str("reset"),
            Self::ResetToDefault(v) => write!(f, "reset to {v}"),
        }
    }
}

// ── ConditionalRule ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ConditionalRule {
    pub target: String,
    pub when: Subject,
    pub predicate: Predicate,
    pub effect: Effect,
}

impl fmt::Display for ConditionalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "when {} {} then {} {}",
            self.when, self.predicate, self.effect, self.target
        )
    }
}

/// Start a rule on a sibling field: `when("authType", Predicate::equals(1)).require("password")`.
pub fn when(field: impl Into<String>, predicate: Predicate) -> RuleCondition {
    RuleCondition {
        when: Subject::Field(field.into()),
        predicate,
    }
}

/// Start a rule on a session flag.
pub fn when_flag(flag: impl Into<String>, predicate: Predicate) -> RuleCondition {
    RuleCondition {
        when: Subject::Flag(flag.into()),
        predicate,
    }
}

/// A condition waiting for its target and effect. Reusable across targets.
#[derive(Debug, Clone)]
pub struct RuleCondition {
    when: Subject,
    predicate: Predicate,
}

impl RuleCondition {
    pub fn then(&self, target: impl Into<String>, effect: Effect) -> ConditionalRule {
        ConditionalRule {
            target: target.into(),
            when: self.when.clone(),
            predicate: self.predicate.clone(),
            effect,
        }
    }

    pub fn require(&self, target: impl Into<String>) -> ConditionalRule {
        self.then(target, Effect::Require)
    }

    pub fn optional(&self, target: impl Into<String>) -> ConditionalRule {
        self.then(target, Effect::Optional)
    }

    pub fn reset(&self, target: impl Into<String>) -> ConditionalRule {
        self.then(target, Effect::ResetToEmpty)
    }

    pub fn reset_to(
        &self,
        target: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> ConditionalRule {
        self.then(target, Effect::ResetToDefault(value.into()))
    }
}
