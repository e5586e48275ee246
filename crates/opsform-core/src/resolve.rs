// ── Option resolver ──
//
// Projects raw lookup records (sites, radius profiles, SMS providers, ...)
// into a descriptor's choice list. Pure: no cache, no side effects, and
// resolving twice with the same input yields the same descriptor.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::context::SessionContext;
use crate::model::{FieldDescriptor, FieldOption, FieldValue};

/// Which keys of a raw record become an option's label and value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub label_key: Cow<'static, str>,
    pub value_key: Cow<'static, str>,
    /// When set, only records whose value under this key equals the
    /// context's site id are kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_key: Option<Cow<'static, str>>,
}

impl Projection {
    pub fn new(label_key: &'static str, value_key: &'static str) -> Self {
        Self {
            label_key: Cow::Borrowed(label_key),
            value_key: Cow::Borrowed(value_key),
            scope_key: None,
        }
    }

    pub fn scoped_by(mut self, scope_key: &'static str) -> Self {
        self.scope_key = Some(Cow::Borrowed(scope_key));
        self
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new("label", "value")
    }
}

/// One answer from an upstream lookup: ordered raw records plus how to
/// read them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    pub records: Vec<Value>,
    #[serde(default)]
    pub projection: Projection,
}

impl LookupResult {
    pub fn new(records: Vec<Value>, projection: Projection) -> Self {
        Self {
            records,
            projection,
        }
    }

    /// Records already in `{label, value}` shape.
    pub fn labeled(records: Vec<Value>) -> Self {
        Self::new(records, Projection::default())
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Return `descriptor` with its options populated from `lookup`.
///
/// Non-choice descriptors come back unchanged.
pub fn resolve(
    descriptor: &FieldDescriptor,
    lookup: &LookupResult,
    context: &SessionContext,
) -> FieldDescriptor {
    let mut resolved = descriptor.clone();
    if descriptor.kind.is_choice() {
        resolved.options = project(lookup, context);
    }
    resolved
}

/// Project lookup records into options.
///
/// Records missing the label or value key are skipped, and a repeated
/// value keeps its first occurrence.
pub fn project(lookup: &LookupResult, context: &SessionContext) -> Vec<FieldOption> {
    let projection = &lookup.projection;
    let mut options: Vec<FieldOption> = Vec::with_capacity(lookup.records.len());
    let mut skipped = 0usize;

    for record in &lookup.records {
        if let Some(scope_key) = &projection.scope_key {
            let in_scope = match (&context.site_id, record.get(scope_key.as_ref())) {
                (Some(site), Some(scope)) => FieldValue::from(scope.clone()).loose_eq(&site.as_str().into()),
                _ => false,
            };
            if !in_scope {
                continue;
            }
        }

        let (Some(label), Some(value)) = (
            record.get(projection.label_key.as_ref()).and_then(label_text),
            record.get(projection.value_key.as_ref()).map(|v| FieldValue::from(v.clone())),
        ) else {
            skipped += 1;
            continue;
        };
        if !value.is_defined() || options.iter().any(|o| o.value.loose_eq(&value)) {
            skipped += 1;
            continue;
        }
        options.push(FieldOption::literal(value, label));
    }

    if skipped > 0 {
        debug!(skipped, kept = options.len(), "lookup records skipped during projection");
    }
    options
}

fn label_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
