use std::fmt;

use crate::interval::Interval;

/// A (category, type) pair.
///
/// The same shape keys three different things: fact keys, event types, and
/// feature keys (where `cat` holds the feature's source table).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Key {
    pub cat: String,
    pub typ: String,
}

impl Key {
    pub fn new(cat: impl Into<String>, typ: impl Into<String>) -> Self {
        Self {
            cat: cat.into(),
            typ: typ.into(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.cat, self.typ)
    }
}

/// A time-bounded occurrence in a subject's history.
///
/// Immutable once constructed. The JSON payload is carried verbatim and only
/// parsed on demand via [`Event::parsed_json`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Event {
    pub interval: Interval,
    pub key: Key,
    pub value: Option<String>,
    pub json: Option<String>,
}

impl Event {
    pub fn new(
        interval: Interval,
        key: Key,
        value: Option<String>,
        json: Option<String>,
    ) -> Self {
        Self {
            interval,
            key,
            value,
            json,
        }
    }

    /// The raw value payload, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Parse the extra JSON payload. `Ok(None)` when the event carries none.
    pub fn parsed_json(&self) -> Result<Option<serde_json::Value>, serde_json::Error> {
        match &self.json {
            Some(text) => serde_json::from_str(text).map(Some),
            None => Ok(None),
        }
    }
}
