// ── Message keys ──
//
// The engine never carries user-facing text. Every label, error and
// placeholder is a key resolved by a `MessageCatalog` at the edge.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key into the localized message catalog (e.g. `"validation.required"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageKey(Cow<'static, str>);

impl MessageKey {
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    pub fn new(key: impl Into<String>) -> Self {
        Self(Cow::Owned(key.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for MessageKey {
    fn from(key: &'static str) -> Self {
        Self::from_static(key)
    }
}

impl From<String> for MessageKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

/// Well-known keys emitted by the engine.
pub mod keys {
    use super::MessageKey;

    pub const REQUIRED: MessageKey = MessageKey::from_static("validation.required");
    pub const TOO_SHORT: MessageKey = MessageKey::from_static("validation.tooShort");
    pub const TOO_LONG: MessageKey = MessageKey::from_static("validation.tooLong");
    pub const TOO_FEW: MessageKey = MessageKey::from_static("validation.tooFew");
    pub const TOO_MANY: MessageKey = MessageKey::from_static("validation.tooMany");
    pub const NOT_A_NUMBER: MessageKey = MessageKey::from_static("validation.notANumber");
    pub const NOT_AN_INTEGER: MessageKey = MessageKey::from_static("validation.notAnInteger");
    pub const BELOW_MINIMUM: MessageKey = MessageKey::from_static("validation.belowMinimum");
    pub const ABOVE_MAXIMUM: MessageKey = MessageKey::from_static("validation.aboveMaximum");
    pub const NOT_AN_OPTION: MessageKey = MessageKey::from_static("validation.notAnOption");
    pub const INVALID_DATE: MessageKey = MessageKey::from_static("validation.invalidDate");
    pub const DATE_IN_PAST: MessageKey = MessageKey::from_static("validation.dateInPast");
    pub const RANGE_ORDER: MessageKey = MessageKey::from_static("validation.rangeOrder");
    pub const INVALID_IPV4: MessageKey = MessageKey::from_static("validation.format.ipv4");
    pub const INVALID_IP: MessageKey = MessageKey::from_static("validation.format.ip");
    pub const INVALID_MAC: MessageKey = MessageKey::from_static("validation.format.mac");
    pub const INVALID_URL: MessageKey = MessageKey::from_static("validation.format.url");
    pub const INVALID_EMAIL: MessageKey = MessageKey::from_static("validation.format.email");
    pub const INVALID_PHONE: MessageKey = MessageKey::from_static("validation.format.phone");
    pub const INVALID_HOSTNAME: MessageKey =
        MessageKey::from_static("validation.format.hostname");
    pub const INVALID_PATTERN: MessageKey = MessageKey::from_static("validation.format.pattern");

    pub const SUBMIT_FAILED: MessageKey = MessageKey::from_static("submit.failed");
    pub const NO_RESULTS: MessageKey = MessageKey::from_static("options.noResults");
}

/// `messageKey -> displayString` lookup supplied by the i18n layer.
pub trait MessageCatalog {
    /// Resolve a key, or `None` when the catalog has no entry.
    fn lookup(&self, key: &MessageKey) -> Option<Cow<'_, str>>;

    /// Resolve a key, falling back to the key itself so a missing
    /// translation is visible rather than blank.
    fn display(&self, key: &MessageKey) -> String {
        self.lookup(key)
            .map_or_else(|| key.as_str().to_owned(), Cow::into_owned)
    }
}
