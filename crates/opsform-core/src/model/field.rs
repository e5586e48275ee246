// ── Field descriptors ──
//
// Static, declarative description of one logical input: its control
// kind, default requiredness, choice list and value constraints.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::message::{MessageCatalog, MessageKey};
use super::value::FieldValue;

// ── FieldKind ───────────────────────────────────────────────────────

/// The control a field renders as. Closed so every interpreter of
/// descriptors handles every kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum FieldKind {
    Text,
    Number,
    Password,
    Email,
    Date,
    DateRange,
    Select,
    MultiSelect,
    Switch,
    Checklist,
    AutoComplete,
    MapLocation,
    CategoryHeading,
}

impl FieldKind {
    /// Kinds whose value is picked from an `options` list.
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            Self::Select | Self::MultiSelect | Self::Checklist | Self::AutoComplete
        )
    }

    /// Kinds whose value is a list.
    pub fn is_multi(self) -> bool {
        matches!(self, Self::MultiSelect | Self::Checklist | Self::DateRange)
    }

    /// Headings group fields visually and hold no value.
    pub fn carries_value(self) -> bool {
        !matches!(self, Self::CategoryHeading)
    }

    /// The value a field of this kind is reset to when it stops applying.
    pub fn empty_value(self) -> FieldValue {
        match self {
            Self::Text | Self::Password | Self::Email => FieldValue::Text(String::new()),
            Self::MultiSelect | Self::Checklist | Self::DateRange => FieldValue::List(Vec::new()),
            Self::Switch => FieldValue::Bool(false),
            Self::Number
            | Self::Date
            | Self::Select
            | Self::AutoComplete
            | Self::MapLocation
            | Self::CategoryHeading => FieldValue::Null,
        }
    }
}

// ── Options ─────────────────────────────────────────────────────────

/// What an option shows: a catalog key for schema-declared choices, or
/// text taken verbatim from a lookup record. Both serialize as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionLabel {
    Key(MessageKey),
    Literal(String),
}

impl OptionLabel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Key(key) => key.as_str(),
            Self::Literal(text) => text,
        }
    }

    /// Display text. Literals never go through the catalog.
    pub fn display<C: MessageCatalog + ?Sized>(&self, catalog: &C) -> String {
        match self {
            Self::Key(key) => catalog.display(key),
            Self::Literal(text) => text.clone(),
        }
    }
}

impl std::fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<MessageKey> for OptionLabel {
    fn from(key: MessageKey) -> Self {
        Self::Key(key)
    }
}

impl From<&'static str> for OptionLabel {
    fn from(key: &'static str) -> Self {
        Self::Key(MessageKey::from_static(key))
    }
}

/// One entry of a choice list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: FieldValue,
    pub label: OptionLabel,
}

impl FieldOption {
    pub fn new(value: impl Into<FieldValue>, label: impl Into<OptionLabel>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Option whose label is display text rather than a catalog key.
    pub fn literal(value: impl Into<FieldValue>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: OptionLabel::Literal(text.into()),
        }
    }
}

/// Grid width hint (1-12 columns). UI-only, never consulted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub span: u8,
}

impl Default for Layout {
    fn default() -> Self {
        Self { span: 12 }
    }
}

// ── Constraints ─────────────────────────────────────────────────────

/// Well-known value shapes checked by pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Format {
    Ipv4,
    Ip,
    Mac,
    Url,
    Email,
    Phone,
    Hostname,
}

/// A value check that runs whenever the field holds a value, whether or
/// not the field is currently required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Constraint {
    /// Character count for text, element count for lists.
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// Inclusive numeric bounds.
    Range { min: Option<f64>, max: Option<f64> },
    Integer,
    Format { format: Format },
    /// Custom regular expression, compiled at registration.
    Pattern {
        pattern: Cow<'static, str>,
        message: MessageKey,
    },
    /// Date (or every date of a range) must not precede the session's today.
    NotBeforeToday,
    /// A two-element range must be ordered start <= end.
    OrderedRange,
}

impl Constraint {
    pub fn length(min: usize, max: usize) -> Self {
        Self::Length {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn max_length(max: usize) -> Self {
        Self::Length {
            min: None,
            max: Some(max),
        }
    }

    pub fn range(min: f64, max: f64) -> Self {
        Self::Range {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn min(min: f64) -> Self {
        Self::Range {
            min: Some(min),
            max: None,
        }
    }

    pub fn format(format: Format) -> Self {
        Self::Format { format }
    }

    pub fn pattern(pattern: &'static str, message: impl Into<MessageKey>) -> Self {
        Self::Pattern {
            pattern: Cow::Borrowed(pattern),
            message: message.into(),
        }
    }
}

// ── FieldDescriptor ─────────────────────────────────────────────────

/// Static metadata describing one form input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Unique key within the entity's value set.
    pub name: String,
    pub kind: FieldKind,
    /// Label message key; defaults to `field.<name>`.
    pub label: MessageKey,
    /// Used when no conditional rule overrides it.
    pub default_required: bool,
    /// Create-mode value; the kind's empty value when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldValue>,
    /// Ordered choices with unique values. Empty until the option resolver
    /// populates it for dynamic lists.
    #[serde(default)]
    pub options: Vec<FieldOption>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub layout: Layout,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        let label = MessageKey::new(format!("field.{name}"));
        Self {
            name,
            kind,
            label,
            default_required: false,
            default: None,
            options: Vec::new(),
            constraints: Vec::new(),
            layout: Layout::default(),
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn select(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Select)
    }

    pub fn switch(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Switch)
    }

    pub fn required(mut self) -> Self {
        self.default_required = true;
        self
    }

    pub fn label(mut self, label: impl Into<MessageKey>) -> Self {
        self.label = label.into();
        self
    }

    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn option(mut self, value: impl Into<FieldValue>, label: impl Into<MessageKey>) -> Self {
        self.options.push(FieldOption::new(value, label.into()));
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn span(mut self, span: u8) -> Self {
        self.layout.span = span.clamp(1, 12);
        self
    }

    /// Value a fresh create-mode dialog starts with.
    pub fn initial_value(&self) -> FieldValue {
        self.default
            .clone()
            .unwrap_or_else(|| self.kind.empty_value())
    }
}
