use std::collections::BTreeMap;
use std::fmt;

use bincode::Options;
use serde::de::{self, DeserializeSeed, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde_derive::{Deserialize, Serialize};

use crate::context::SerializationContext;
use crate::de::{Decoded, Deserializer, DeserializerConfig};
use crate::error::{ConfigError, DecodeError, EncodeError};
use crate::ser::Serializer;
use crate::value::Value;

/// Upper bound accepted for `size_limit`, 64 MiB.
pub const MAX_SIZE_LIMIT: u64 = 64 * 1024 * 1024;

/// Deepest array/map nesting accepted on decode, the same bound serde_json uses.
pub const MAX_NESTING_DEPTH: usize = 128;

const VALUE_VARIANTS: &[&str] = &["Null", "Bool", "Int", "Float", "String", "Bytes", "Array", "Map"];

// length prefixes are untrusted, never reserve more than this up front
const MAX_PREALLOC: usize = 4096;

/// Options shared by [`BincodeSerializer`] and [`BincodeDeserializer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BincodeConfig {
    #[serde(flatten)]
    pub base: DeserializerConfig,
    /// Largest payload, in bytes, either direction will handle. Unbounded when unset.
    pub size_limit: Option<u64>,
}

impl BincodeConfig {
    pub fn with_size_limit(size_limit: u64) -> Self {
        Self { base: DeserializerConfig::default(), size_limit: Some(size_limit) }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate()?;
        match self.size_limit {
            Some(0) => Err(ConfigError::InvalidOption("size_limit must be greater than 0".to_string())),
            Some(limit) if limit > MAX_SIZE_LIMIT => Err(ConfigError::InvalidOption(format!(
                "size_limit must not exceed {}",
                MAX_SIZE_LIMIT
            ))),
            _ => Ok(()),
        }
    }

    // varint integers, little endian, trailing bytes rejected.
    // bincode ignores the limit when reading from a slice, decode checks it up front.
    fn options(&self) -> impl Options {
        bincode::DefaultOptions::new().with_limit(self.size_limit.unwrap_or(u64::MAX))
    }
}

/// Reads a [`Value`] the way its derived `Deserialize` does, but fails once
/// arrays and maps nest deeper than [`MAX_NESTING_DEPTH`].
#[derive(Debug, Clone, Copy)]
struct BoundedValue {
    depth: usize,
}

impl BoundedValue {
    fn root() -> Self {
        BoundedValue { depth: 0 }
    }

    fn nested(self) -> Self {
        BoundedValue { depth: self.depth + 1 }
    }
}

impl<'de> DeserializeSeed<'de> for BoundedValue {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_enum("Value", VALUE_VARIANTS, self)
    }
}

impl<'de> Visitor<'de> for BoundedValue {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a record value")
    }

    fn visit_enum<A>(self, data: A) -> Result<Value, A::Error>
    where
        A: EnumAccess<'de>,
    {
        let (index, variant) = data.variant::<u32>()?;
        match index {
            0 => variant.unit_variant().map(|_| Value::Null),
            1 => variant.newtype_variant().map(Value::Bool),
            2 => variant.newtype_variant().map(Value::Int),
            3 => variant.newtype_variant().map(Value::Float),
            4 => variant.newtype_variant().map(Value::String),
            5 => variant
                .newtype_variant::<serde_bytes::ByteBuf>()
                .map(|buf| Value::Bytes(buf.into_vec())),
            6 | 7 if self.depth >= MAX_NESTING_DEPTH => Err(de::Error::custom(format!(
                "nesting too deep, limit is {}",
                MAX_NESTING_DEPTH
            ))),
            6 => variant.newtype_variant_seed(BoundedArray(self.nested())).map(Value::Array),
            7 => variant.newtype_variant_seed(BoundedMap(self.nested())).map(Value::Map),
            other => Err(de::Error::invalid_value(
                de::Unexpected::Unsigned(other as u64),
                &"variant index 0 <= i < 8",
            )),
        }
    }
}

struct BoundedArray(BoundedValue);

impl<'de> DeserializeSeed<'de> for BoundedArray {
    type Value = Vec<Value>;

    fn deserialize<D>(self, deserializer: D) -> Result<Vec<Value>, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for BoundedArray {
    type Value = Vec<Value>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of record values")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Vec<Value>, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(MAX_PREALLOC));
        while let Some(item) = seq.next_element_seed(self.0)? {
            items.push(item);
        }
        Ok(items)
    }
}

struct BoundedMap(BoundedValue);

impl<'de> DeserializeSeed<'de> for BoundedMap {
    type Value = BTreeMap<String, Value>;

    fn deserialize<D>(self, deserializer: D) -> Result<BTreeMap<String, Value>, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for BoundedMap {
    type Value = BTreeMap<String, Value>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of record values")
    }

    fn visit_map<A>(self, mut map: A) -> Result<BTreeMap<String, Value>, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = BTreeMap::new();
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value_seed(self.0)?;
            entries.insert(key, value);
        }
        Ok(entries)
    }
}

/// Decodes record values written by [`BincodeSerializer`].
#[derive(Debug, Clone, Default)]
pub struct BincodeDeserializer {
    config: BincodeConfig,
}

impl BincodeDeserializer {
    pub fn new(config: BincodeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Deserializer for BincodeDeserializer {
    fn decode(&self, _ctx: &SerializationContext<'_>, payload: &[u8]) -> Result<Decoded, DecodeError> {
        if payload.is_empty() {
            return Err(DecodeError::Empty);
        }
        if let Some(limit) = self.config.size_limit {
            if payload.len() as u64 > limit {
                return Err(DecodeError::Malformed(format!(
                    "payload of {} bytes exceeds size_limit {}",
                    payload.len(),
                    limit
                )));
            }
        }
        let value = self
            .config
            .options()
            .deserialize_seed(BoundedValue::root(), payload)
            .map_err(|e| DecodeError::Malformed(format!("bincode decode error: {}", e)))?;
        Ok(Decoded::One(value))
    }

    fn column_name(&self) -> Option<&str> {
        self.config.base.column_name.as_deref()
    }

    fn format_name(&self) -> &'static str {
        "bincode"
    }
}

/// Compact binary encoding of any record value
#[derive(Debug, Clone, Default)]
pub struct BincodeSerializer {
    config: BincodeConfig,
}

impl BincodeSerializer {
    pub fn new(config: BincodeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Serializer for BincodeSerializer {
    fn encode(&self, _ctx: &SerializationContext<'_>, value: &Value) -> Result<Vec<u8>, EncodeError> {
        self.config.options().serialize(value).map_err(|e| match *e {
            bincode::ErrorKind::SizeLimit => EncodeError::SizeLimitExceeded {
                limit: self.config.size_limit.unwrap_or(u64::MAX),
            },
            other => EncodeError::Failed(format!("bincode encode error: {}", other)),
        })
    }

    fn format_name(&self) -> &'static str {
        "bincode"
    }
}
