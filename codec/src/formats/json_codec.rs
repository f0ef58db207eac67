use serde_derive::{Deserialize, Serialize};

use crate::context::SerializationContext;
use crate::de::{Decoded, Deserializer, DeserializerConfig};
use crate::error::{ConfigError, DecodeError, EncodeError};
use crate::ser::Serializer;
use crate::value::Value;

/// Options for [`JsonDeserializer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonDeserializerConfig {
    #[serde(flatten)]
    pub base: DeserializerConfig,
    /// Treat each payload as a top-level array and emit every item as its own record.
    #[serde(default)]
    pub split_values: bool,
}

impl JsonDeserializerConfig {
    pub fn with_column(column_name: impl Into<String>) -> Self {
        Self { base: DeserializerConfig::with_column(column_name), split_values: false }
    }

    pub fn split(mut self) -> Self {
        self.split_values = true;
        self
    }
}

/// Parses JSON documents into record values.
#[derive(Debug, Clone, Default)]
pub struct JsonDeserializer {
    config: JsonDeserializerConfig,
}

impl JsonDeserializer {
    pub fn new(config: JsonDeserializerConfig) -> Result<Self, ConfigError> {
        config.base.validate()?;
        Ok(Self { config })
    }
}

pub(crate) fn parse_json(payload: &[u8]) -> Result<serde_json::Value, DecodeError> {
    if payload.iter().all(u8::is_ascii_whitespace) {
        return Err(DecodeError::Empty);
    }
    serde_json::from_slice(payload).map_err(|e| DecodeError::Malformed(format!("JSON decode error: {}", e)))
}

impl Deserializer for JsonDeserializer {
    fn decode(&self, _ctx: &SerializationContext<'_>, payload: &[u8]) -> Result<Decoded, DecodeError> {
        let json = parse_json(payload)?;
        if !self.config.split_values {
            return Ok(Decoded::One(Value::try_from_json(json)?));
        }

        match json {
            serde_json::Value::Array(items) => Ok(Decoded::Many(
                items.into_iter().map(Value::try_from_json).collect::<Result<_, _>>()?,
            )),
            other => Err(DecodeError::Malformed(format!(
                "expected a top-level array to split, got {}",
                Value::from(other).kind()
            ))),
        }
    }

    fn column_name(&self) -> Option<&str> {
        self.config.base.column_name.as_deref()
    }

    fn split_values(&self) -> bool {
        self.config.split_values
    }

    fn format_name(&self) -> &'static str {
        "json"
    }
}

/// Writes record values as compact (or pretty) JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonSerializer {
    fn encode(&self, _ctx: &SerializationContext<'_>, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let json = value.to_json()?;
        let encoded = if self.pretty { serde_json::to_vec_pretty(&json) } else { serde_json::to_vec(&json) };
        encoded.map_err(|e| EncodeError::Failed(format!("JSON encode error: {}", e)))
    }

    fn format_name(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::de::{DeserializerExt, Records};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ctx() -> SerializationContext<'static> {
        SerializationContext::for_topic("events")
    }

    #[test]
    fn test_json_decode() {
        let de = JsonDeserializer::default();
        let records = de.deserialize(&ctx(), br#"{"id": 1, "name": "a"}"#).unwrap();
        assert_eq!(records, Records::One(Value::from(json!({"id": 1, "name": "a"}))));

        let records = de.deserialize(&ctx(), b"[1, 2]").unwrap();
        assert_eq!(records, Records::One(Value::Array(vec![Value::Int(1), Value::Int(2)])));
    }

    #[test]
    fn test_json_decode_with_column() {
        let de = JsonDeserializer::new(JsonDeserializerConfig::with_column("payload")).unwrap();
        let records = de.deserialize(&ctx(), b"\"hello\"").unwrap();
        assert_eq!(records, Records::One(Value::wrap("payload", Value::from("hello"))));
    }

    #[test]
    fn test_json_decode_invalid() {
        let de = JsonDeserializer::default();
        assert_eq!(de.deserialize(&ctx(), b"").unwrap_err(), DecodeError::Empty);
        assert_eq!(de.deserialize(&ctx(), b"  \n").unwrap_err(), DecodeError::Empty);
        assert!(matches!(de.deserialize(&ctx(), b"{\"id\": "), Err(DecodeError::Malformed(_))));
        assert!(matches!(de.deserialize(&ctx(), b"invalid"), Err(DecodeError::Malformed(_))));
        assert!(matches!(de.deserialize(&ctx(), b"{} {}"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_json_decode_integer_overflow() {
        let de = JsonDeserializer::default();
        assert!(matches!(
            de.deserialize(&ctx(), br#"{"big": 18446744073709551615}"#),
            Err(DecodeError::Malformed(msg)) if msg.contains("18446744073709551615")
        ));
        assert_eq!(
            de.deserialize(&ctx(), b"9223372036854775807").unwrap(),
            Records::One(Value::Int(i64::MAX))
        );
        assert_eq!(de.deserialize(&ctx(), b"1e20").unwrap(), Records::One(Value::Float(1e20)));

        let split = JsonDeserializer::new(JsonDeserializerConfig::default().split()).unwrap();
        assert!(matches!(
            split.deserialize(&ctx(), b"[1, 9223372036854775808]"),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_json_split() {
        let de = JsonDeserializer::new(JsonDeserializerConfig::with_column("c").split()).unwrap();
        assert!(de.split_values());

        let records = de.deserialize(&ctx(), br#"[{"x": 1}, 2]"#).unwrap();
        assert_eq!(
            records,
            Records::Many(vec![
                Value::wrap("c", Value::from(json!({"x": 1}))),
                Value::wrap("c", Value::Int(2)),
            ])
        );

        let records = de.deserialize(&ctx(), b"[]").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_json_split_requires_array() {
        let de = JsonDeserializer::new(JsonDeserializerConfig::default().split()).unwrap();
        let err = de.deserialize(&ctx(), br#"{"x": 1}"#).unwrap_err();
        assert_eq!(err, DecodeError::Malformed("expected a top-level array to split, got map".to_string()));
    }

    #[test]
    fn test_json_encode() {
        let ser = JsonSerializer::new();
        let value = Value::from(json!({"b": [1, 2], "a": null}));
        assert_eq!(ser.encode(&ctx(), &value).unwrap(), br#"{"a":null,"b":[1,2]}"#.to_vec());

        let pretty = JsonSerializer::pretty().encode(&ctx(), &value).unwrap();
        assert!(String::from_utf8(pretty).unwrap().contains('\n'));
    }

    #[test]
    fn test_json_encode_unsupported() {
        let ser = JsonSerializer::new();
        assert_eq!(
            ser.encode(&ctx(), &Value::Bytes(vec![1])),
            Err(EncodeError::UnsupportedValue { format: "json", kind: "bytes" })
        );
        assert!(ser.encode(&ctx(), &Value::Float(f64::NAN)).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let de = JsonDeserializer::default();
        let ser = JsonSerializer::new();

        let test_cases = vec![
            json!(null),
            json!(true),
            json!(-17),
            json!(0.125),
            json!("你好世界"),
            json!([1, "two", [3.5]]),
            json!({"user": {"id": 9, "tags": ["a"]}, "active": false}),
        ];

        for case in test_cases {
            let value = Value::from(case);
            let encoded = ser.encode(&ctx(), &value).unwrap();
            assert_eq!(de.deserialize(&ctx(), &encoded).unwrap(), Records::One(value));
        }
    }

    #[test]
    fn test_config_from_json() {
        let config: JsonDeserializerConfig =
            serde_json::from_str(r#"{"column_name": "v", "split_values": true}"#).unwrap();
        assert_eq!(config, JsonDeserializerConfig::with_column("v").split());

        let config: JsonDeserializerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, JsonDeserializerConfig::default());
    }
}
