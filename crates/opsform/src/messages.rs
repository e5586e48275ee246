//! English display strings for engine message keys.
//!
//! The engine only emits keys. The console resolves them here: config
//! `[messages]` overrides first, then the built-in table, then a label
//! derived from the key itself (`field.customTimeout` -> "Custom timeout").

use std::borrow::Cow;
use std::collections::BTreeMap;

use opsform_core::{MessageCatalog, MessageKey};

/// Key namespaces whose last segment is a camelCase identifier.
const NAMESPACES: &[&str] = &[
    "field", "portal", "voucher", "ssid", "site", "device", "campaign", "acl", "account",
    "radius", "unit", "scheme",
];

const BUILTIN: &[(&str, &str)] = &[
    ("validation.required", "This field is required"),
    ("validation.tooShort", "Too short"),
    ("validation.tooLong", "Too long"),
    ("validation.tooFew", "Select more entries"),
    ("validation.tooMany", "Too many entries"),
    ("validation.notANumber", "Must be a number"),
    ("validation.notAnInteger", "Must be a whole number"),
    ("validation.belowMinimum", "Value is below the minimum"),
    ("validation.aboveMaximum", "Value is above the maximum"),
    ("validation.notAnOption", "Not one of the available options"),
    ("validation.invalidDate", "Not a valid date (YYYY-MM-DD)"),
    ("validation.dateInPast", "Date cannot be in the past"),
    ("validation.rangeOrder", "End must not be before start"),
    ("validation.format.ipv4", "Not a valid IPv4 address"),
    ("validation.format.ip", "Not a valid IP address"),
    ("validation.format.mac", "Not a valid MAC address"),
    ("validation.format.url", "Not a valid URL"),
    ("validation.format.email", "Not a valid email address"),
    ("validation.format.phone", "Not a valid phone number"),
    ("validation.format.hostname", "Not a valid hostname"),
    ("validation.format.pattern", "Invalid format"),
    ("submit.failed", "Save failed, try again"),
    ("options.noResults", "No results"),
    (
        "account.username.invalid",
        "Start with a letter; letters, digits, dot, dash and underscore only",
    ),
    ("field.ssidIds", "SSIDs"),
    ("field.siteId", "Site"),
    ("field.vlanId", "VLAN ID"),
    ("field.landingUrl", "Landing URL"),
];

pub struct ConsoleCatalog {
    overrides: BTreeMap<String, String>,
}

impl ConsoleCatalog {
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }
}

impl MessageCatalog for ConsoleCatalog {
    fn lookup(&self, key: &MessageKey) -> Option<Cow<'_, str>> {
        let key = key.as_str();
        if let Some(text) = self.overrides.get(key) {
            return Some(Cow::Borrowed(text.as_str()));
        }
        if let Some((_, text)) = BUILTIN.iter().find(|(k, _)| *k == key) {
            return Some(Cow::Borrowed(*text));
        }
        humanize(key).map(Cow::Owned)
    }
}

/// "portal.authType.none" -> "None", "field.customTimeoutEnable" -> "Custom timeout enable".
fn humanize(key: &str) -> Option<String> {
    let (namespace, _) = key.split_once('.')?;
    if !NAMESPACES.contains(&namespace) {
        return None;
    }
    let last = key.rsplit('.').next()?;
    if last.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(last.len() + 4);
    for (i, ch) in last.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else if ch.is_ascii_uppercase() {
            out.push(' ');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    Some(out)
}
