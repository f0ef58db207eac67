use std::sync::Arc;

use crate::context::{MessageField, SerializationContext};
use crate::de::{Decoded, Deserializer, DeserializerConfig};
use crate::error::{ConfigError, DecodeError, EncodeError};
use crate::formats::json_codec::{parse_json, JsonSerializer};
use crate::schema::{RecordSchema, SchemaCache, SchemaSource};
use crate::ser::Serializer;
use crate::value::Value;

/// Resolves the schema for a message through the cache.
struct SchemaResolver {
    source: Arc<dyn SchemaSource>,
    cache: Arc<SchemaCache>,
    field: MessageField,
}

impl SchemaResolver {
    fn resolve(&self, ctx: &SerializationContext<'_>) -> Result<Arc<RecordSchema>, String> {
        self.cache.get_or_fetch(&ctx.subject(self.field), self.source.as_ref())
    }
}

/// JSON decoding that rejects records not matching the subject's schema.
pub struct SchemaJsonDeserializer {
    config: DeserializerConfig,
    resolver: SchemaResolver,
}

impl SchemaJsonDeserializer {
    pub fn new(source: Arc<dyn SchemaSource>, config: DeserializerConfig) -> Result<Self, ConfigError> {
        Self::with_cache(source, Arc::new(SchemaCache::new()), config)
    }

    /// Share `cache` with other codecs talking to the same source.
    pub fn with_cache(
        source: Arc<dyn SchemaSource>,
        cache: Arc<SchemaCache>,
        config: DeserializerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            resolver: SchemaResolver { source, cache, field: MessageField::Value },
        })
    }

    /// Resolve schemas for the message key instead of the value.
    pub fn for_key(mut self) -> Self {
        self.resolver.field = MessageField::Key;
        self
    }
}

impl Deserializer for SchemaJsonDeserializer {
    fn decode(&self, ctx: &SerializationContext<'_>, payload: &[u8]) -> Result<Decoded, DecodeError> {
        let value = Value::try_from_json(parse_json(payload)?)?;
        let schema = self.resolver.resolve(ctx).map_err(DecodeError::Schema)?;
        schema.validate(&value).map_err(DecodeError::SchemaMismatch)?;
        Ok(Decoded::One(value))
    }

    fn column_name(&self) -> Option<&str> {
        self.config.column_name.as_deref()
    }

    fn format_name(&self) -> &'static str {
        "schema-json"
    }
}

/// JSON encoding that refuses values violating the subject's schema.
pub struct SchemaJsonSerializer {
    json: JsonSerializer,
    resolver: SchemaResolver,
}

impl SchemaJsonSerializer {
    pub fn new(source: Arc<dyn SchemaSource>) -> Self {
        Self::with_cache(source, Arc::new(SchemaCache::new()))
    }

    pub fn with_cache(source: Arc<dyn SchemaSource>, cache: Arc<SchemaCache>) -> Self {
        Self {
            json: JsonSerializer::new(),
            resolver: SchemaResolver { source, cache, field: MessageField::Value },
        }
    }

    pub fn for_key(mut self) -> Self {
        self.resolver.field = MessageField::Key;
        self
    }
}

impl Serializer for SchemaJsonSerializer {
    fn encode(&self, ctx: &SerializationContext<'_>, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let schema = self
            .resolver
            .resolve(ctx)
            .map_err(|e| EncodeError::Failed(format!("schema lookup failed: {}", e)))?;
        schema.validate(value).map_err(EncodeError::SchemaViolation)?;
        self.json.encode(ctx, value)
    }

    fn format_name(&self) -> &'static str {
        "schema-json"
    }
}
