use crate::context::SerializationContext;
use crate::de::{Decoded, Deserializer, DeserializerConfig};
use crate::error::{ConfigError, DecodeError, EncodeError};
use crate::ser::Serializer;
use crate::value::Value;

/// UTF-8 text payloads
#[derive(Debug, Clone, Default)]
pub struct StringDeserializer {
    config: DeserializerConfig,
}

impl StringDeserializer {
    pub fn new(config: DeserializerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Deserializer for StringDeserializer {
    fn decode(&self, _ctx: &SerializationContext<'_>, payload: &[u8]) -> Result<Decoded, DecodeError> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| DecodeError::Malformed(format!("UTF-8 decode error: {}", e)))?;
        Ok(Decoded::One(Value::String(text.to_string())))
    }

    fn column_name(&self) -> Option<&str> {
        self.config.column_name.as_deref()
    }

    fn format_name(&self) -> &'static str {
        "string"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StringSerializer;

impl StringSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl Serializer for StringSerializer {
    fn encode(&self, _ctx: &SerializationContext<'_>, value: &Value) -> Result<Vec<u8>, EncodeError> {
        match value {
            Value::String(s) => Ok(s.as_bytes().to_vec()),
            other => Err(EncodeError::UnsupportedValue { format: "string", kind: other.kind() }),
        }
    }

    fn format_name(&self) -> &'static str {
        "string"
    }
}
