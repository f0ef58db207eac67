//! Dynamic record value exchanged between codecs and the processing graph.

use std::collections::BTreeMap;

use serde_derive::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};

/// A structured record value.
///
/// Text formats map it onto JSON, binary formats carry it verbatim through serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(#[serde(with = "serde_bytes")] Vec<u8>),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Nest `value` under `column`, producing a single-field record.
    pub fn wrap(column: &str, value: Value) -> Value {
        let mut map = BTreeMap::new();
        map.insert(column.to_string(), value);
        Value::Map(map)
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a field of a map value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Convert into a JSON document.
    ///
    /// Bytes and non-finite floats have no JSON form and are rejected.
    pub fn to_json(&self) -> Result<serde_json::Value, EncodeError> {
        let json = match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => match serde_json::Number::from_f64(*f) {
                Some(n) => serde_json::Value::Number(n),
                None => return Err(EncodeError::OutOfRange(format!("{} is not a finite number", f))),
            },
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Bytes(_) => {
                return Err(EncodeError::UnsupportedValue { format: "json", kind: self.kind() })
            }
            Value::Array(items) => serde_json::Value::Array(
                items.iter().map(Value::to_json).collect::<Result<Vec<_>, _>>()?,
            ),
            Value::Map(map) => {
                let mut object = serde_json::Map::new();
                for (k, v) in map {
                    object.insert(k.clone(), v.to_json()?);
                }
                serde_json::Value::Object(object)
            }
        };
        Ok(json)
    }

    /// Convert a parsed JSON document, failing on integers that don't fit in `i64`.
    ///
    /// This is the conversion the JSON codecs decode with.
    pub fn try_from_json(json: serde_json::Value) -> Result<Value, DecodeError> {
        let value = match json {
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None if n.is_u64() => {
                    return Err(DecodeError::Malformed(format!("integer {} does not fit in 64 bits", n)))
                }
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::try_from_json).collect::<Result<_, _>>()?)
            }
            serde_json::Value::Object(object) => Value::Map(
                object
                    .into_iter()
                    .map(|(k, v)| Value::try_from_json(v).map(|v| (k, v)))
                    .collect::<Result<_, _>>()?,
            ),
            other => Value::from(other),
        };
        Ok(value)
    }
}

/// Lossless except for integers above `i64::MAX`, which become the nearest
/// `Float`. Use [`Value::try_from_json`] to reject those instead.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                // u64 above i64::MAX and real numbers both land here
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(object) => {
                Value::Map(object.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}
