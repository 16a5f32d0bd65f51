//! Dynamic value resolution and typed mapping
//!
//! Decoding a KAS return value is done in two independent steps:
//!
//! 1. [`resolve`] classifies a [`ValueNode`] into a closed [`Value`] variant.
//! 2. [`map_value`] projects that [`Value`] onto a caller-defined
//!    `serde::Deserialize` type, matching the protocol's field names.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use crate::decode::ValueNode;
use crate::error::{KasError, Result};

/// Type tag marking a node whose children form a sequence.
const ARRAY_TAG: &str = "Array";

/// An untyped KAS value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    String(String),
    Float(f64),
    Int(i64),
    List(Vec<Value>),
    /// Entries keep the order in which the server sent them.
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Literal text of a scalar as it would appear on the wire.
    ///
    /// Returns `None` for lists and maps.
    pub fn to_wire_text(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::Float(f) => Some(f.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::List(_) | Self::Map(_) => None,
        }
    }

    /// Whether this is the empty string an empty element resolves to.
    pub fn is_empty_string(&self) -> bool {
        matches!(self, Self::String(s) if s.is_empty())
    }
}

/// Resolves a generic value node. The first matching rule wins:
///
/// 1. a non-empty `nil` marker is a boolean literal;
/// 2. non-empty text is a scalar interpreted by its type tag
///    (`string`, `float`, `int`, anything else is kept as text);
/// 3. a `value` sub-node is unwrapped;
/// 4. children with the `Array` tag form a list in document order;
/// 5. other children form a map keyed by each child's `key` text, a later
///    duplicate key overwriting the earlier value;
/// 6. anything else is the empty string.
///
/// Scalar parsing is permissive: a malformed boolean, float or integer
/// literal becomes `false`, `0.0` or `0`. The server types its values
/// inconsistently and this layer cannot tell malformed from absent, so this
/// never fails.
pub fn resolve(node: &ValueNode) -> Value {
    if !node.raw.is_empty() {
        return Value::Bool(parse_bool(&node.raw));
    }

    if !node.text.is_empty() {
        return match node.type_tag.as_str() {
            "float" => Value::Float(node.text.parse().unwrap_or_default()),
            "int" => Value::Int(node.text.parse().unwrap_or_default()),
            _ => Value::String(node.text.clone()),
        };
    }

    if let Some(inner) = node.value.as_deref() {
        return resolve(inner);
    }

    if !node.items.is_empty() {
        if node.type_tag == ARRAY_TAG {
            return Value::List(node.items.iter().map(resolve).collect());
        }

        let mut map = IndexMap::with_capacity(node.items.len());
        for item in &node.items {
            map.insert(item.key_text().to_string(), resolve(item));
        }
        return Value::Map(map);
    }

    Value::String(String::new())
}

fn parse_bool(raw: &str) -> bool {
    match raw.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => true,
        _ => false,
    }
}

/// Maps a resolved value onto `T`.
///
/// Integers widen into float fields. Any other mismatch, e.g. a map where a
/// scalar is expected, fails with [`KasError::Mapping`].
pub fn map_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value.into()).map_err(KasError::mapping)
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => Self::Bool(b),
            Value::String(s) => Self::String(s),
            Value::Int(i) => Self::Number(i.into()),
            // NaN and infinities have no JSON form
            Value::Float(f) => serde_json::Number::from_f64(f).map_or(Self::Null, Self::Number),
            Value::List(items) => Self::Array(items.into_iter().map(Into::into).collect()),
            Value::Map(entries) => Self::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.into()))
                    .collect(),
            ),
        }
    }
}
