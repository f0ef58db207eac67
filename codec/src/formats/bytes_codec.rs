use crate::context::SerializationContext;
use crate::de::{Decoded, Deserializer, DeserializerConfig};
use crate::error::{ConfigError, DecodeError, EncodeError};
use crate::ser::Serializer;
use crate::value::Value;

/// Passes the payload through untouched.
#[derive(Debug, Clone, Default)]
pub struct BytesDeserializer {
    config: DeserializerConfig,
}

impl BytesDeserializer {
    pub fn new(config: DeserializerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Deserializer for BytesDeserializer {
    fn decode(&self, _ctx: &SerializationContext<'_>, payload: &[u8]) -> Result<Decoded, DecodeError> {
        Ok(Decoded::One(Value::Bytes(payload.to_vec())))
    }

    fn column_name(&self) -> Option<&str> {
        self.config.column_name.as_deref()
    }

    fn format_name(&self) -> &'static str {
        "bytes"
    }
}

/// Writes byte values as-is; strings are written as their UTF-8 bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesSerializer;

impl BytesSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl Serializer for BytesSerializer {
    fn encode(&self, _ctx: &SerializationContext<'_>, value: &Value) -> Result<Vec<u8>, EncodeError> {
        match value {
            Value::Bytes(bytes) => Ok(bytes.clone()),
            Value::String(s) => Ok(s.as_bytes().to_vec()),
            other => Err(EncodeError::UnsupportedValue { format: "bytes", kind: other.kind() }),
        }
    }

    fn format_name(&self) -> &'static str {
        "bytes"
    }
}
