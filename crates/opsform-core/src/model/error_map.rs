// ── Error map ──

use indexmap::IndexMap;
use serde::Serialize;

use super::message::MessageKey;

/// Field name -> message key for every field that failed a check.
///
/// Absence means valid. Entries keep the order in which fields were
/// checked, which is descriptor (tab) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap(IndexMap<String, MessageKey>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, key: MessageKey) -> Option<MessageKey> {
        self.0.insert(field.into(), key)
    }

    pub fn get(&self, field: &str) -> Option<&MessageKey> {
        self.0.get(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<MessageKey> {
        self.0.shift_remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MessageKey)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &MessageKey) -> bool) {
        self.0.retain(|k, v| keep(k, v));
    }
}

impl FromIterator<(String, MessageKey)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (String, MessageKey)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
