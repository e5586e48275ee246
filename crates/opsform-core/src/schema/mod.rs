// ── Validation schema compiler ──
//
// Composes an entity's descriptors and conditional rules into one
// immutable `EntitySchema`. Structural mistakes in the tables are caught
// here, at compile time of the schema, never at render time.

mod format;

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use crate::context::{SessionContext, flags};
use crate::error::SchemaError;
use crate::evaluate::{Evaluation, evaluate};
use crate::model::{
    ConditionalRule, Constraint, EntityKind, ErrorMap, FieldDescriptor, FieldKind, FieldOption,
    FieldValue, MessageKey, Subject, ValueSet, keys,
};

pub(crate) use format::parse_date;

/// Options resolved at runtime, keyed by field name. Overrides the
/// descriptor's static list for validation.
pub type ResolvedOptions = IndexMap<String, Vec<FieldOption>>;

/// Compiled descriptor + rule pair for one entity kind.
#[derive(Debug)]
pub struct EntitySchema {
    kind: EntityKind,
    descriptors: Vec<FieldDescriptor>,
    rules: Vec<ConditionalRule>,
    /// Compiled `Constraint::Pattern`s keyed by (descriptor, constraint) index.
    patterns: HashMap<(usize, usize), Regex>,
}

/// Compile an entity schema, rejecting broken tables.
pub fn compile(
    kind: EntityKind,
    descriptors: Vec<FieldDescriptor>,
    rules: Vec<ConditionalRule>,
) -> Result<EntitySchema, SchemaError> {
    EntitySchema::compile(kind, descriptors, rules)
}

impl EntitySchema {
    pub fn compile(
        kind: EntityKind,
        descriptors: Vec<FieldDescriptor>,
        rules: Vec<ConditionalRule>,
    ) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for descriptor in &descriptors {
            if !seen.insert(descriptor.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    entity: kind,
                    field: descriptor.name.clone(),
                });
            }
            check_unique_options(kind, descriptor)?;
        }

        for rule in &rules {
            let target = descriptors
                .iter()
                .find(|d| d.name == rule.target)
                .ok_or_else(|| SchemaError::UnknownField {
                    entity: kind,
                    field: rule.target.clone(),
                    role: "target",
                })?;
            if !target.kind.carries_value() {
                return Err(SchemaError::ValuelessTarget {
                    entity: kind,
                    field: rule.target.clone(),
                });
            }
            match &rule.when {
                Subject::Field(name) if !seen.contains(name.as_str()) => {
                    return Err(SchemaError::UnknownField {
                        entity: kind,
                        field: name.clone(),
                        role: "controller",
                    });
                }
                Subject::Flag(name) if !flags::is_known(name) => {
                    return Err(SchemaError::UnknownFlag {
                        entity: kind,
                        flag: name.clone(),
                    });
                }
                _ => {}
            }
        }

        let mut patterns = HashMap::new();
        for (di, descriptor) in descriptors.iter().enumerate() {
            for (ci, constraint) in descriptor.constraints.iter().enumerate() {
                if let Constraint::Pattern { pattern, .. } = constraint {
                    let regex = Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
                        entity: kind,
                        field: descriptor.name.clone(),
                        reason: e.to_string(),
                    })?;
                    patterns.insert((di, ci), regex);
                }
            }
        }

        debug!(
            entity = %kind,
            fields = descriptors.len(),
            rules = rules.len(),
            "compiled entity schema"
        );

        Ok(Self {
            kind,
            descriptors,
            rules,
            patterns,
        })
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Descriptors in declaration (render/tab) order.
    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    pub fn rules(&self) -> &[ConditionalRule] {
        &self.rules
    }

    pub fn descriptor(&self, name: &str) -> Option<&FieldDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Create-mode starting values for every value-carrying field.
    pub fn initial_values(&self) -> ValueSet {
        self.descriptors
            .iter()
            .filter(|d| d.kind.carries_value())
            .map(|d| (d.name.clone(), d.initial_value()))
            .collect()
    }

    pub fn evaluate(&self, values: &ValueSet, context: &SessionContext) -> Evaluation {
        evaluate(&self.descriptors, &self.rules, values, context)
    }

    /// Validate with the descriptors' static option lists.
    pub fn validate(&self, values: &ValueSet, context: &SessionContext) -> ErrorMap {
        self.validate_with(values, context, &ResolvedOptions::new())
    }

    /// Validate a full value set.
    ///
    /// Fields the evaluator marks not applicable are skipped. Otherwise an
    /// empty value fails only when required; a present value runs the
    /// kind's implicit checks, then the declared constraints, and the
    /// first failure is reported.
    pub fn validate_with(
        &self,
        values: &ValueSet,
        context: &SessionContext,
        resolved: &ResolvedOptions,
    ) -> ErrorMap {
        let evaluation = self.evaluate(values, context);
        let mut errors = ErrorMap::new();

        for (index, descriptor) in self.descriptors.iter().enumerate() {
            let Some(state) = evaluation.state(&descriptor.name) else {
                continue;
            };
            if !state.visible {
                continue;
            }

            let value = values.value(&descriptor.name);
            if value.is_empty() {
                if state.required {
                    errors.insert(descriptor.name.clone(), keys::REQUIRED);
                }
                continue;
            }

            let options = resolved
                .get(&descriptor.name)
                .map_or(descriptor.options.as_slice(), Vec::as_slice);
            if let Some(key) = self.check_value(index, descriptor, value, options, context) {
                errors.insert(descriptor.name.clone(), key);
            }
        }

        errors
    }

    fn check_value(
        &self,
        index: usize,
        descriptor: &FieldDescriptor,
        value: &FieldValue,
        options: &[FieldOption],
        context: &SessionContext,
    ) -> Option<MessageKey> {
        check_kind(descriptor.kind, value, options).or_else(|| {
            descriptor
                .constraints
                .iter()
                .enumerate()
                .find_map(|(ci, constraint)| {
                    self.check_constraint(index, ci, constraint, value, context)
                })
        })
    }

    fn check_constraint(
        &self,
        index: usize,
        ci: usize,
        constraint: &Constraint,
        value: &FieldValue,
        context: &SessionContext,
    ) -> Option<MessageKey> {
        match constraint {
            Constraint::Length { min, max } => {
                let len = match value {
                    FieldValue::List(items) => {
                        return check_bounds(items.len(), *min, *max, keys::TOO_FEW, keys::TOO_MANY);
                    }
                    FieldValue::Text(s) => s.chars().count(),
                    _ => return None,
                };
                check_bounds(len, *min, *max, keys::TOO_SHORT, keys::TOO_LONG)
            }
            Constraint::Range { min, max } => {
                let Some(n) = value.as_f64() else {
                    return Some(keys::NOT_A_NUMBER);
                };
                if min.is_some_and(|m| n < m) {
                    Some(keys::BELOW_MINIMUM)
                } else if max.is_some_and(|m| n > m) {
                    Some(keys::ABOVE_MAXIMUM)
                } else {
                    None
                }
            }
            Constraint::Integer => match value.as_f64() {
                None => Some(keys::NOT_A_NUMBER),
                Some(n) if n.fract().abs() > f64::EPSILON => Some(keys::NOT_AN_INTEGER),
                Some(_) => None,
            },
            Constraint::Format { format } => {
                each_scalar(value).find(|raw| !format.matches(raw)).map(|_| format.message())
            }
            Constraint::Pattern { message, .. } => {
                let regex = self.patterns.get(&(index, ci))?;
                each_scalar(value)
                    .find(|raw| !regex.is_match(raw.trim()))
                    .map(|_| message.clone())
            }
            Constraint::NotBeforeToday => {
                for raw in each_scalar(value) {
                    match parse_date(&raw) {
                        None => return Some(keys::INVALID_DATE),
                        Some(date) if date < context.today => return Some(keys::DATE_IN_PAST),
                        Some(_) => {}
                    }
                }
                None
            }
            Constraint::OrderedRange => check_ordered(value),
        }
    }
}

/// Checks implied by the field kind alone.
fn check_kind(kind: FieldKind, value: &FieldValue, options: &[FieldOption]) -> Option<MessageKey> {
    match kind {
        FieldKind::Number => value.as_f64().is_none().then_some(keys::NOT_A_NUMBER),
        FieldKind::Email => each_scalar(value)
            .any(|raw| !crate::model::Format::Email.matches(&raw))
            .then_some(keys::INVALID_EMAIL),
        FieldKind::Date | FieldKind::DateRange => each_scalar(value)
            .any(|raw| parse_date(&raw).is_none())
            .then_some(keys::INVALID_DATE),
        // An unloaded (empty) option list cannot reject anything.
        FieldKind::Select | FieldKind::MultiSelect | FieldKind::Checklist
            if !options.is_empty() =>
        {
            let known = |v: &FieldValue| options.iter().any(|o| o.value.loose_eq(v));
            let ok = match value {
                FieldValue::List(items) => items.iter().all(known),
                scalar => known(scalar),
            };
            (!ok).then_some(keys::NOT_AN_OPTION)
        }
        _ => None,
    }
}

fn check_bounds(
    len: usize,
    min: Option<usize>,
    max: Option<usize>,
    short: MessageKey,
    long: MessageKey,
) -> Option<MessageKey> {
    if min.is_some_and(|m| len < m) {
        Some(short)
    } else if max.is_some_and(|m| len > m) {
        Some(long)
    } else {
        None
    }
}

/// Two-element ranges must be ordered; dates compare as dates, anything
/// else numerically.
fn check_ordered(value: &FieldValue) -> Option<MessageKey> {
    let [start, end] = value.as_list()? else {
        return Some(keys::RANGE_ORDER);
    };
    let ordered = match (start.as_str().and_then(parse_date), end.as_str().and_then(parse_date)) {
        (Some(a), Some(b)) => a <= b,
        _ => match (start.as_f64(), end.as_f64()) {
            (Some(a), Some(b)) => a <= b,
            _ => return Some(keys::RANGE_ORDER),
        },
    };
    (!ordered).then_some(keys::RANGE_ORDER)
}

/// Scalars of a value as text: each element of a list, or the value itself.
fn each_scalar(value: &FieldValue) -> impl Iterator<Item = String> + '_ {
    let items: Box<dyn Iterator<Item = &FieldValue> + '_> = match value {
        FieldValue::List(items) => Box::new(items.iter()),
        scalar => Box::new(std::iter::once(scalar)),
    };
    items.filter(|v| !v.is_empty()).map(ToString::to_string)
}

fn check_unique_options(kind: EntityKind, descriptor: &FieldDescriptor) -> Result<(), SchemaError> {
    for (i, option) in descriptor.options.iter().enumerate() {
        if descriptor.options[..i]
            .iter()
            .any(|earlier| earlier.value.loose_eq(&option.value))
        {
            return Err(SchemaError::DuplicateOption {
                entity: kind,
                field: descriptor.name.clone(),
                value: option.value.to_string(),
            });
        }
    }
    Ok(())
}
