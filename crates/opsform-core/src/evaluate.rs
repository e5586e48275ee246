// ── Conditional rule evaluator ──
//
// Pure function from (descriptors, rules, values, context) to the
// effective required/visible state of every field plus the resets the
// caller must apply. Single generation: the whole pass reads the value
// set as it was on entry; cascading is the caller's job.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::trace;

use crate::context::SessionContext;
use crate::model::{ConditionalRule, Effect, FieldDescriptor, FieldValue, Subject, ValueSet};

/// Effective state of one field after rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldState {
    pub required: bool,
    /// `false` once a reset effect marked the field not applicable.
    pub visible: bool,
}

/// Result of one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Evaluation {
    /// One entry per value-carrying descriptor, in declaration order.
    pub states: IndexMap<String, FieldState>,
    /// Fields whose current value differs from their reset target.
    pub resets: IndexMap<String, FieldValue>,
}

impl Evaluation {
    pub fn state(&self, field: &str) -> Option<FieldState> {
        self.states.get(field).copied()
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.states.get(field).is_some_and(|s| s.required)
    }

    /// Unknown fields read as visible.
    pub fn is_visible(&self, field: &str) -> bool {
        self.states.get(field).is_none_or(|s| s.visible)
    }

    /// Field -> required, the requirement view of the evaluation.
    pub fn requirement(&self) -> IndexMap<&str, bool> {
        self.states
            .iter()
            .map(|(name, s)| (name.as_str(), s.required))
            .collect()
    }

    pub fn has_resets(&self) -> bool {
        !self.resets.is_empty()
    }
}

/// Run every rule once against `values`.
///
/// Rules whose controlling value is undefined (`Null` or missing) never
/// fire. For each target the effect of the last matching rule wins;
/// fields with no matching rule keep `default_required` and stay visible.
pub fn evaluate(
    descriptors: &[FieldDescriptor],
    rules: &[ConditionalRule],
    values: &ValueSet,
    context: &SessionContext,
) -> Evaluation {
    let mut winning: IndexMap<&str, &Effect> = IndexMap::new();

    for rule in rules {
        let controlling = match &rule.when {
            Subject::Field(name) => values.value(name).clone(),
            Subject::Flag(name) => context.flag(name),
        };
        if !controlling.is_defined() {
            continue;
        }
        if rule.predicate.test(&controlling) {
            trace!(rule = %rule, "rule matched");
            winning.insert(rule.target.as_str(), &rule.effect);
        }
    }

    let mut evaluation = Evaluation::default();
    for descriptor in descriptors.iter().filter(|d| d.kind.carries_value()) {
        let name = descriptor.name.as_str();
        let state = match winning.get(name) {
            None => FieldState {
                required: descriptor.default_required,
                visible: true,
            },
            Some(Effect::Require) => FieldState {
                required: true,
                visible: true,
            },
            Some(Effect::Optional) => FieldState {
                required: false,
                visible: true,
            },
            Some(effect) => {
                let target = match effect {
                    Effect::ResetToDefault(value) => value.clone(),
                    _ => descriptor.kind.empty_value(),
                };
                if *values.value(name) != target {
                    evaluation.resets.insert(descriptor.name.clone(), target);
                }
                FieldState {
                    required: false,
                    visible: false,
                }
            }
        };
        evaluation.states.insert(descriptor.name.clone(), state);
    }

    evaluation
}
