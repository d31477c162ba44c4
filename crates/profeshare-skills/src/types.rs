//! Boundary types: the raw stored skills field and a normalized skill name.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The skills field exactly as it was stored on a profile record.
///
/// Conversion from an arbitrary JSON value is total: `null`, booleans and
/// numbers all collapse to [`RawSkillsValue::Absent`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum RawSkillsValue {
    /// No skills recorded.
    #[default]
    Absent,

    /// A string, normally a JSON-encoded array, possibly encoded twice or
    /// not JSON at all.
    Text(String),

    /// An already-decoded list. Entries are not guaranteed to be strings.
    Sequence(Vec<Value>),

    /// Legacy shape: category name → list of skills, in stored key order.
    Mapping(Map<String, Value>),
}

impl RawSkillsValue {
    /// Whether this value carries nothing worth parsing.
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Sequence(items) => items.is_empty(),
            Self::Mapping(map) => map.is_empty(),
        }
    }

    /// Decode `text` as JSON, keeping its shape.
    ///
    /// Arrays, objects, strings and `null` map as in the `From<Value>`
    /// conversion. Numbers, booleans and text that is not JSON at all are
    /// kept verbatim as [`RawSkillsValue::Text`].
    pub fn from_json_text(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value @ (Value::Array(_) | Value::Object(_) | Value::String(_) | Value::Null)) => {
                Self::from(value)
            }
            Ok(_) | Err(_) => Self::Text(text.to_owned()),
        }
    }

    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Text(_) => "text",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }
}

impl From<Value> for RawSkillsValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null | Value::Bool(_) | Value::Number(_) => Self::Absent,
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::Sequence(items),
            Value::Object(map) => Self::Mapping(map),
        }
    }
}

impl From<RawSkillsValue> for Value {
    fn from(raw: RawSkillsValue) -> Self {
        match raw {
            RawSkillsValue::Absent => Value::Null,
            RawSkillsValue::Text(text) => Value::String(text),
            RawSkillsValue::Sequence(items) => Value::Array(items),
            RawSkillsValue::Mapping(map) => Value::Object(map),
        }
    }
}

impl From<&str> for RawSkillsValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for RawSkillsValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl<S: Into<String>> FromIterator<S> for RawSkillsValue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::Sequence(iter.into_iter().map(|s| Value::String(s.into())).collect())
    }
}

/// A normalized skill name: trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SkillName(String);

impl SkillName {
    /// Trim `raw` and wrap it, or return `None` if nothing is left.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for SkillName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SkillName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for SkillName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SkillName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl TryFrom<String> for SkillName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value).ok_or_else(|| "skill name must not be empty".to_owned())
    }
}

impl From<SkillName> for String {
    fn from(name: SkillName) -> Self {
        name.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
