use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, BytesMut};

use crate::context::SerializationContext;
use crate::de::{Decoded, Deserializer, DeserializerConfig};
use crate::error::{ConfigError, DecodeError, EncodeError};
use crate::ser::Serializer;
use crate::value::Value;

const INT_WIDTH: usize = 4;
const DOUBLE_WIDTH: usize = 8;

fn check_width(payload: &[u8], expected: usize) -> Result<(), DecodeError> {
    if payload.is_empty() {
        return Err(DecodeError::Empty);
    }
    if payload.len() != expected {
        return Err(DecodeError::Truncated { expected, actual: payload.len() });
    }
    Ok(())
}

/// Big-endian signed 32-bit integers
#[derive(Debug, Clone, Default)]
pub struct IntegerDeserializer {
    config: DeserializerConfig,
}

impl IntegerDeserializer {
    pub fn new(config: DeserializerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Deserializer for IntegerDeserializer {
    fn decode(&self, _ctx: &SerializationContext<'_>, payload: &[u8]) -> Result<Decoded, DecodeError> {
        check_width(payload, INT_WIDTH)?;
        Ok(Decoded::One(Value::Int(BigEndian::read_i32(payload) as i64)))
    }

    fn column_name(&self) -> Option<&str> {
        self.config.column_name.as_deref()
    }

    fn format_name(&self) -> &'static str {
        "integer"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerSerializer;

impl IntegerSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl Serializer for IntegerSerializer {
    fn encode(&self, _ctx: &SerializationContext<'_>, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let i = match value {
            Value::Int(i) => *i,
            other => return Err(EncodeError::UnsupportedValue { format: "integer", kind: other.kind() }),
        };
        let i = i32::try_from(i).map_err(|_| EncodeError::OutOfRange(format!("{} does not fit in 32 bits", i)))?;

        let mut buf = BytesMut::with_capacity(INT_WIDTH);
        buf.put_i32(i);
        Ok(buf.to_vec())
    }

    fn format_name(&self) -> &'static str {
        "integer"
    }
}

/// Big-endian IEEE 754 doubles
#[derive(Debug, Clone, Default)]
pub struct DoubleDeserializer {
    config: DeserializerConfig,
}

impl DoubleDeserializer {
    pub fn new(config: DeserializerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Deserializer for DoubleDeserializer {
    fn decode(&self, _ctx: &SerializationContext<'_>, payload: &[u8]) -> Result<Decoded, DecodeError> {
        check_width(payload, DOUBLE_WIDTH)?;
        Ok(Decoded::One(Value::Float(BigEndian::read_f64(payload))))
    }

    fn column_name(&self) -> Option<&str> {
        self.config.column_name.as_deref()
    }

    fn format_name(&self) -> &'static str {
        "double"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleSerializer;

impl DoubleSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl Serializer for DoubleSerializer {
    fn encode(&self, _ctx: &SerializationContext<'_>, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let f = match value {
            Value::Float(f) => *f,
            Value::Int(i) => {
                let f = *i as f64;
                // i128 so the comparison can't saturate near i64::MAX
                if f as i128 != *i as i128 {
                    return Err(EncodeError::OutOfRange(format!("{} has no exact double representation", i)));
                }
                f
            }
            other => return Err(EncodeError::UnsupportedValue { format: "double", kind: other.kind() }),
        };

        let mut buf = BytesMut::with_capacity(DOUBLE_WIDTH);
        buf.put_f64(f);
        Ok(buf.to_vec())
    }

    fn format_name(&self) -> &'static str {
        "double"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::de::{DeserializerExt, Records};

    fn ctx() -> SerializationContext<'static> {
        SerializationContext::for_topic("numbers")
    }

    #[test]
    fn test_integer_decode() {
        let de = IntegerDeserializer::default();
        assert_eq!(de.deserialize(&ctx(), &[0, 0, 0, 42]).unwrap(), Records::One(Value::Int(42)));
        assert_eq!(de.deserialize(&ctx(), &[0xff, 0xff, 0xff, 0xff]).unwrap(), Records::One(Value::Int(-1)));
    }

    #[test]
    fn test_integer_decode_invalid_length() {
        let de = IntegerDeserializer::default();
        assert_eq!(de.deserialize(&ctx(), b"").unwrap_err(), DecodeError::Empty);
        assert_eq!(
            de.deserialize(&ctx(), &[0, 0, 1]).unwrap_err(),
            DecodeError::Truncated { expected: 4, actual: 3 }
        );
        assert_eq!(
            de.deserialize(&ctx(), &[0, 0, 0, 0, 1]).unwrap_err(),
            DecodeError::Truncated { expected: 4, actual: 5 }
        );
    }

    #[test]
    fn test_integer_encode() {
        let ser = IntegerSerializer::new();
        assert_eq!(hex::encode(ser.encode(&ctx(), &Value::Int(258)).unwrap()), "00000102");
        assert_eq!(hex::encode(ser.encode(&ctx(), &Value::Int(-2)).unwrap()), "fffffffe");
    }

    #[test]
    fn test_integer_encode_rejects() {
        let ser = IntegerSerializer::new();
        assert_eq!(
            ser.encode(&ctx(), &Value::from("12")),
            Err(EncodeError::UnsupportedValue { format: "integer", kind: "string" })
        );
        assert!(matches!(ser.encode(&ctx(), &Value::Int(i64::MAX)), Err(EncodeError::OutOfRange(_))));
        assert!(matches!(ser.encode(&ctx(), &Value::Float(1.0)), Err(EncodeError::UnsupportedValue { .. })));
    }

    #[test]
    fn test_integer_roundtrip() {
        let de = IntegerDeserializer::new(DeserializerConfig::with_column("n")).unwrap();
        let ser = IntegerSerializer::new();

        for i in [0i64, 1, -1, i32::MAX as i64, i32::MIN as i64] {
            let encoded = ser.encode(&ctx(), &Value::Int(i)).unwrap();
            assert_eq!(de.deserialize(&ctx(), &encoded).unwrap(), Records::One(Value::wrap("n", Value::Int(i))));
        }
    }

    #[test]
    fn test_double_decode() {
        let de = DoubleDeserializer::default();
        let payload = hex::decode("3ff8000000000000").unwrap();
        assert_eq!(de.deserialize(&ctx(), &payload).unwrap(), Records::One(Value::Float(1.5)));
        assert_eq!(de.deserialize(&ctx(), b"").unwrap_err(), DecodeError::Empty);
        assert!(matches!(de.deserialize(&ctx(), &[0; 4]), Err(DecodeError::Truncated { expected: 8, actual: 4 })));
    }

    #[test]
    fn test_double_encode() {
        let ser = DoubleSerializer::new();
        assert_eq!(hex::encode(ser.encode(&ctx(), &Value::Float(1.5)).unwrap()), "3ff8000000000000");
        assert_eq!(hex::encode(ser.encode(&ctx(), &Value::Int(2)).unwrap()), "4000000000000000");
        assert!(matches!(ser.encode(&ctx(), &Value::Null), Err(EncodeError::UnsupportedValue { .. })));
    }

    #[test]
    fn test_double_encode_inexact_int() {
        let ser = DoubleSerializer::new();
        let de = DoubleDeserializer::default();

        for i in [(1i64 << 53) + 1, -(1i64 << 53) - 1, i64::MAX, i64::MIN + 1] {
            assert!(
                matches!(ser.encode(&ctx(), &Value::Int(i)), Err(EncodeError::OutOfRange(_))),
                "{} should be rejected",
                i
            );
        }

        for i in [1i64 << 53, -(1i64 << 53), 1i64 << 60, i64::MIN] {
            let encoded = ser.encode(&ctx(), &Value::Int(i)).unwrap();
            assert_eq!(de.deserialize(&ctx(), &encoded).unwrap(), Records::One(Value::Float(i as f64)));
        }
    }

    #[test]
    fn test_double_roundtrip() {
        let de = DoubleDeserializer::default();
        let ser = DoubleSerializer::new();

        for f in [0.0, -0.5, 3.141592653589793, f64::MAX, f64::MIN_POSITIVE, f64::INFINITY] {
            let encoded = ser.encode(&ctx(), &Value::Float(f)).unwrap();
            assert_eq!(de.deserialize(&ctx(), &encoded).unwrap(), Records::One(Value::Float(f)));
        }
    }
}
