//! The decode half of the codec contract.
//!
//! Concrete formats implement [`Deserializer::decode`]. The runtime calls
//! [`DeserializerExt::deserialize`], which checks the result shape against
//! [`Deserializer::split_values`] and applies column wrapping. The blanket
//! implementation means a format can't override that policy.

use serde_derive::{Deserialize, Serialize};

use crate::context::SerializationContext;
use crate::error::{ConfigError, DecodeError};
use crate::value::Value;

/// Raw result of a format-specific decode.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    One(Value),
    Many(Vec<Value>),
}

/// Decode result after the contract-level policies have been applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Records {
    One(Value),
    Many(Vec<Value>),
}

impl Records {
    /// Number of downstream records this result fans out to.
    pub fn len(&self) -> usize {
        match self {
            Records::One(_) => 1,
            Records::Many(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<Value> {
        match self {
            Records::One(value) => vec![value],
            Records::Many(values) => values,
        }
    }
}

/// Decode capability implemented by every concrete format.
pub trait Deserializer: Send + Sync {
    /// Turn payload bytes into one value, or a sequence when `split_values` is set.
    fn decode(&self, ctx: &SerializationContext<'_>, payload: &[u8]) -> Result<Decoded, DecodeError>;

    /// When set, every decoded value is returned as `{column_name: value}`.
    fn column_name(&self) -> Option<&str> {
        None
    }

    /// Whether each decode result is a sequence of independent records.
    ///
    /// This is a static property of the instance; it must not depend on the payload.
    fn split_values(&self) -> bool {
        false
    }

    /// Get the name of this format
    fn format_name(&self) -> &'static str;
}

/// Contract-level decoding, available on every [`Deserializer`].
pub trait DeserializerExt: Deserializer {
    fn deserialize(&self, ctx: &SerializationContext<'_>, payload: &[u8]) -> Result<Records, DecodeError> {
        let decoded = self.decode(ctx, payload)?;
        let column = self.column_name();
        match (self.split_values(), decoded) {
            (false, Decoded::One(value)) => Ok(Records::One(wrap_column(column, value))),
            (true, Decoded::Many(values)) => Ok(Records::Many(
                values.into_iter().map(|v| wrap_column(column, v)).collect(),
            )),
            (split_values, _) => Err(DecodeError::ShapeMismatch { split_values }),
        }
    }
}

impl<D: Deserializer + ?Sized> DeserializerExt for D {}

/// Apply the column wrapping policy to a single value.
pub fn wrap_column(column: Option<&str>, value: Value) -> Value {
    match column {
        Some(name) => Value::wrap(name, value),
        None => value,
    }
}

/// Options shared by every deserializer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeserializerConfig {
    /// Wrap decoded values into `{column_name: value}`.
    pub column_name: Option<String>,
}

impl DeserializerConfig {
    pub fn with_column(column_name: impl Into<String>) -> Self {
        Self { column_name: Some(column_name.into()) }
    }

    /// Column names must contain something other than whitespace.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.column_name {
            Some(name) if name.trim().is_empty() => Err(ConfigError::InvalidColumnName(name.clone())),
            _ => Ok(()),
        }
    }
}
