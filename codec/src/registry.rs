use std::collections::HashMap;
use std::sync::Arc;

use crate::context::{MessageHeader, SerializationContext};
use crate::de::{Deserializer, DeserializerExt};
use crate::error::{CResult, Error};
use crate::ser::Serializer;
use crate::value::Value;

/// Per-topic codec wiring used by the runtime at the pipeline's I/O edge.
///
/// Each inbound message gets a fresh [`SerializationContext`] and its decode
/// result is fanned out into a list of records. Topics without their own
/// codec fall back to the defaults, if any.
#[derive(Default, Clone)]
pub struct CodecRegistry {
    deserializers: HashMap<String, Arc<dyn Deserializer>>,
    serializers: HashMap<String, Arc<dyn Serializer>>,
    default_deserializer: Option<Arc<dyn Deserializer>>,
    default_serializer: Option<Arc<dyn Serializer>>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a deserializer for a specific topic
    pub fn register_deserializer(&mut self, topic: impl Into<String>, deserializer: Arc<dyn Deserializer>) {
        let topic = topic.into();
        log::debug!("registered {} deserializer for topic '{}'", deserializer.format_name(), topic);
        self.deserializers.insert(topic, deserializer);
    }

    /// Register a serializer for a specific topic
    pub fn register_serializer(&mut self, topic: impl Into<String>, serializer: Arc<dyn Serializer>) {
        let topic = topic.into();
        log::debug!("registered {} serializer for topic '{}'", serializer.format_name(), topic);
        self.serializers.insert(topic, serializer);
    }

    pub fn set_default_deserializer(&mut self, deserializer: Arc<dyn Deserializer>) {
        self.default_deserializer = Some(deserializer);
    }

    pub fn set_default_serializer(&mut self, serializer: Arc<dyn Serializer>) {
        self.default_serializer = Some(serializer);
    }

    pub fn deserializer_for(&self, topic: &str) -> Option<Arc<dyn Deserializer>> {
        match self.deserializers.get(topic) {
            Some(de) => Some(de.clone()),
            None => {
                log::trace!("no deserializer for topic '{}', using default", topic);
                self.default_deserializer.clone()
            }
        }
    }

    pub fn serializer_for(&self, topic: &str) -> Option<Arc<dyn Serializer>> {
        match self.serializers.get(topic) {
            Some(ser) => Some(ser.clone()),
            None => {
                log::trace!("no serializer for topic '{}', using default", topic);
                self.default_serializer.clone()
            }
        }
    }

    /// Decode an inbound message into the records it fans out to.
    pub fn decode(&self, topic: &str, headers: Option<&[MessageHeader]>, payload: &[u8]) -> CResult<Vec<Value>> {
        let deserializer = self
            .deserializer_for(topic)
            .ok_or_else(|| Error::NoCodec(topic.to_string()))?;
        let ctx = SerializationContext::new(topic, headers);
        Ok(deserializer.deserialize(&ctx, payload)?.into_vec())
    }

    /// Encode an outbound value for `topic`.
    pub fn encode(&self, topic: &str, headers: Option<&[MessageHeader]>, value: &Value) -> CResult<Vec<u8>> {
        let serializer = self
            .serializer_for(topic)
            .ok_or_else(|| Error::NoCodec(topic.to_string()))?;
        let ctx = SerializationContext::new(topic, headers);
        Ok(serializer.encode(&ctx, value)?)
    }

    /// Topics with a dedicated deserializer or serializer, sorted.
    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self
            .deserializers
            .keys()
            .chain(self.serializers.keys())
            .cloned()
            .collect();
        topics.sort();
        topics.dedup();
        topics
    }
}
