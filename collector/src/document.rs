//! Read-only, path-based access to decoded command responses and log entries.
//!
//! Responses are decoded once into a [`serde_json::Value`] tree (relaxed extended JSON for BSON
//! replies) and then queried with dotted paths such as `network.numRequests` or `t.$date`. A
//! numeric segment indexes into an array.
//!
//! Lookups never fail the caller: numeric reads fall back to [`SENTINEL`] and log a warning,
//! string reads fall back to an empty string.

use crate::error::ParseError;
use serde_json::Value;

/// Substituted for numbers that are absent or cannot be coerced.
pub const SENTINEL: f64 = -1.0;

/// Single-key extended JSON wrappers whose content is a number.
const NUMBER_WRAPPERS: [&str; 4] = ["$numberInt", "$numberLong", "$numberDouble", "$numberDecimal"];

/// A decoded response tree, owned by the collector call that produced it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    pub fn root(&self) -> Node<'_> {
        Node::new(&self.root)
    }

    pub fn get(&self, path: &str) -> Node<'_> {
        self.root().get(path)
    }

    pub fn f64(&self, path: &str) -> f64 {
        self.root().f64(path)
    }

    pub fn string(&self, path: &str) -> String {
        self.root().string(path)
    }

    pub fn label(&self, path: &str) -> String {
        self.root().label(path)
    }
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

/// A position inside a [`Document`]. Absent paths yield an empty node rather than an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node<'a> {
    value: Option<&'a Value>,
}

impl<'a> Node<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value: Some(value) }
    }

    pub fn absent() -> Self {
        Self { value: None }
    }

    pub fn value(&self) -> Option<&'a Value> {
        self.value
    }

    pub fn is_present(&self) -> bool {
        !matches!(self.value, None | Some(Value::Null))
    }

    pub fn get(&self, path: &str) -> Node<'a> {
        let mut current = self.value;
        for segment in path.split('.').filter(|segment| !segment.is_empty()) {
            current = current.and_then(|value| match value {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
                _ => None,
            });
        }
        Node { value: current }
    }

    /// Numbers, numeric strings and extended JSON number wrappers coerce to `f64`.
    pub fn try_f64(&self) -> Result<f64, ParseError> {
        match self.value {
            None | Some(Value::Null) => Err(ParseError::Missing),
            Some(value) => coerce_f64(value),
        }
    }

    /// Numeric value at `path`, or [`SENTINEL`] with a warning.
    pub fn f64(&self, path: &str) -> f64 {
        match self.get(path).try_f64() {
            Ok(value) => value,
            Err(err) => {
                warn!(path, %err, "Could not read a number, using {SENTINEL}");
                SENTINEL
            }
        }
    }

    /// This node's own numeric value, or [`SENTINEL`] with a warning.
    pub fn number(&self) -> f64 {
        self.f64("")
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.value.and_then(Value::as_str)
    }

    /// Scalar at `path` rendered as text; empty for anything else.
    pub fn string(&self, path: &str) -> String {
        match self.get(path).value {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::Bool(flag)) => flag.to_string(),
            _ => String::new(),
        }
    }

    /// Like [`Node::string`], but a missing or non-scalar value is logged as a warning.
    pub fn label(&self, path: &str) -> String {
        match self.get(path).value {
            Some(Value::String(_) | Value::Number(_) | Value::Bool(_)) => self.string(path),
            _ => {
                warn!(path, "Missing label value, using empty value");
                String::new()
            }
        }
    }

    /// Key/value pairs of an object node in document order; empty for any other node.
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, Node<'a>)> + 'a {
        self.value
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|map| map.iter())
            .map(|(key, value)| (key.as_str(), Node::new(value)))
    }

    /// Elements of an array node in order; empty for any other node.
    pub fn items(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        self.value
            .and_then(Value::as_array)
            .into_iter()
            .flat_map(|items| items.iter())
            .map(Node::new)
    }

    /// The first key of an object node, in the order the decoder preserved.
    pub fn first_key(&self) -> Option<&'a str> {
        self.value
            .and_then(Value::as_object)
            .and_then(|map| map.keys().next())
            .map(String::as_str)
    }

    pub fn to_document(&self) -> Document {
        Document::new(self.value.cloned().unwrap_or(Value::Null))
    }
}

fn coerce_f64(value: &Value) -> Result<f64, ParseError> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| ParseError::NotNumeric(number.to_string())),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .ok_or_else(|| ParseError::NotNumeric(format!("{text:?}"))),
        Value::Object(map) if map.len() == 1 => match map.iter().next() {
            Some((key, inner)) if NUMBER_WRAPPERS.contains(&key.as_str()) => coerce_f64(inner),
            _ => Err(ParseError::NotNumeric("an object".to_string())),
        },
        Value::Object(_) => Err(ParseError::NotNumeric("an object".to_string())),
        Value::Array(_) => Err(ParseError::NotNumeric("an array".to_string())),
        Value::Bool(flag) => Err(ParseError::NotNumeric(format!("boolean {flag}"))),
        Value::Null => Err(ParseError::Missing),
    }
}
