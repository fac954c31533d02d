//! Field identity, declared kinds and values

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::BindError;

/// Separator between group and property in a qualified name
pub const NAME_SEPARATOR: char = '.';

/// Sentinel value of a selection-required field meaning "nothing selected yet"
pub const SENTINEL_NONE: &str = "NONE";

/// Field identifier of the form `group.property`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub group: String,
    pub property: String,
}

impl QualifiedName {
    #[must_use]
    pub fn new(group: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            property: property.into(),
        }
    }
}

impl FromStr for QualifiedName {
    type Err = BindError;

    /// Splits on the first separator; both halves must be non-empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(NAME_SEPARATOR) {
            Some((group, property)) if !group.is_empty() && !property.is_empty() => {
                Ok(Self::new(group, property))
            }
            _ => Err(BindError::MalformedName(s.to_string())),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{NAME_SEPARATOR}{}", self.group, self.property)
    }
}

/// Declared semantic type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Boolean,
    /// Enumerated string restricted to the listed options
    Choice(&'static [&'static str]),
}

impl FieldKind {
    /// Human-readable type name used in mismatch errors
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Choice(_) => "choice",
        }
    }

    /// Whether `value` is a legal value of this kind
    #[must_use]
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Self::Text, FieldValue::Text(_))
            | (Self::Integer, FieldValue::Integer(_))
            | (Self::Boolean, FieldValue::Boolean(_)) => true,
            (Self::Decimal, FieldValue::Decimal(d)) => d.is_finite(),
            (Self::Choice(options), FieldValue::Choice(c)) => options.contains(&c.as_str()),
            _ => false,
        }
    }

    /// Convert a raw UI string into a value of this kind
    ///
    /// Numbers are trimmed before parsing; text is taken verbatim.
    #[must_use]
    pub fn coerce(&self, raw: &str) -> Option<FieldValue> {
        match self {
            Self::Text => Some(FieldValue::Text(raw.to_string())),
            Self::Integer => raw.trim().parse().ok().map(FieldValue::Integer),
            Self::Decimal => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|d| d.is_finite())
                .map(FieldValue::Decimal),
            Self::Boolean => parse_bool(raw).map(FieldValue::Boolean),
            Self::Choice(options) => options
                .iter()
                .find(|o| **o == raw)
                .map(|o| FieldValue::Choice((*o).to_string())),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => Some(true),
        "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Current value of a field
///
/// Serialized untagged, so a group renders as a plain JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
    Choice(String),
}

impl FieldValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Choice(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Decimal(d) => Some(*d),
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Plain JSON scalar for fact payloads
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Decimal(d) => serde_json::Value::from(*d),
            Self::Text(s) | Self::Choice(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Text(s) | Self::Choice(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(d: f64) -> Self {
        Self::Decimal(d)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}
