// ── Field values ──
//
// The dynamic value carried by a single form input, and the ordered
// value set owned by one open dialog instance.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

// ── FieldValue ──────────────────────────────────────────────────────

/// Current value of one form input.
///
/// Select widgets hand back strings, numeric inputs hand back numbers,
/// switches hand back booleans, and denormalized records may carry any of
/// them for the same field. Comparisons used by rule predicates therefore
/// go through [`loose_eq`](Self::loose_eq) rather than `==`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
}

static NULL: FieldValue = FieldValue::Null;

/// Largest integer an `f64` holds exactly (2^53 - 1).
const MAX_EXACT_INT: f64 = 9_007_199_254_740_991.0;

/// Integer reading of a whole-number `f64`, so records keep `1812` rather
/// than `1812.0` when written back out.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn whole_number(n: f64) -> Option<i64> {
    (n.is_finite() && n.fract().abs() < f64::EPSILON && n.abs() <= MAX_EXACT_INT)
        .then_some(n as i64)
}

impl FieldValue {
    /// `true` for anything but `Null`.
    pub fn is_defined(&self) -> bool {
        !matches!(self, Self::Null)
    }

    /// Emptiness as seen by the required check: null, blank text, empty
    /// list, or NaN. `false` is a value, not an absence.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(_) => false,
            Self::Number(n) => n.is_nan(),
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Numeric view. Text is parsed after trimming.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) if !n.is_nan() => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
            _ => None,
        }
    }

    /// Boolean view. Accepts `"true"`/`"false"` text and `1`/`0`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(s) => match s.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            Self::Number(n) if (*n - 1.0).abs() < f64::EPSILON => Some(true),
            Self::Number(n) if n.abs() < f64::EPSILON => Some(false),
            _ => None,
        }
    }

    /// Truthiness used by `Truthy`/`Falsy` predicates.
    ///
    /// Boolean-like values use their boolean reading; everything else is
    /// truthy when non-empty.
    pub fn is_truthy(&self) -> bool {
        self.as_bool().unwrap_or_else(|| !self.is_empty())
    }

    /// Equality that tolerates the string/number/bool drift between widget
    /// values and record values (`1 == "1"`, `true == "true"`).
    pub fn loose_eq(&self, other: &FieldValue) -> bool {
        if self == other {
            return true;
        }
        match (self, other) {
            (Self::Number(_), Self::Text(_)) | (Self::Text(_), Self::Number(_)) => {
                match (self.as_f64(), other.as_f64()) {
                    (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
                    _ => false,
                }
            }
            (Self::Bool(_), Self::Text(_)) | (Self::Text(_), Self::Bool(_)) => {
                match (self.as_bool(), other.as_bool()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            _ => false,
        }
    }

    /// Convert into a `serde_json::Value` for submission payloads.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => match whole_number(*n) {
                Some(i) => serde_json::Value::Number(i.into()),
                None => serde_json::Number::from_f64(*n)
                    .map_or(serde_json::Value::Null, serde_json::Value::Number),
            },
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => match whole_number(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Self::Text(s) => serializer.serialize_str(s),
            Self::List(items) => items.serialize(serializer),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            // Nested objects (map pins, composite pickers) travel as JSON text.
            obj @ serde_json::Value::Object(_) => Self::Text(obj.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(items: Vec<FieldValue>) -> Self {
        Self::List(items)
    }
}

// ── ValueSet ────────────────────────────────────────────────────────

/// Field name -> current value for one entity dialog.
///
/// Insertion order is preserved so snapshots serialize in a stable order.
/// A name with no entry reads as [`FieldValue::Null`] (undefined).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueSet(IndexMap<String, FieldValue>);

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Like [`get`](Self::get) but reads a missing entry as `Null`.
    pub fn value(&self, name: &str) -> &FieldValue {
        self.0.get(name).unwrap_or(&NULL)
    }

    /// Set a value, returning the previous one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.0.insert(name.into(), value.into())
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.0.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge another set over this one; entries in `other` win.
    pub fn extend(&mut self, other: ValueSet) {
        self.0.extend(other.0);
    }

    /// Build from a denormalized JSON record.
    pub fn from_json_object(record: serde_json::Map<String, serde_json::Value>) -> Self {
        record
            .into_iter()
            .map(|(k, v)| (k, FieldValue::from(v)))
            .collect()
    }

    /// Serialize into a JSON object for the submit contract.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, FieldValue)> for ValueSet {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ValueSet {
    type Item = (String, FieldValue);
    type IntoIter = indexmap::map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
