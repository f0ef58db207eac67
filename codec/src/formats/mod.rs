use std::fmt;

use crate::error::ConfigError;

pub mod bincode_codec;
pub mod bytes_codec;
pub mod json_codec;
pub mod numeric_codec;
pub mod string_codec;

pub use bincode_codec::{BincodeConfig, BincodeDeserializer, BincodeSerializer};
pub use bytes_codec::{BytesDeserializer, BytesSerializer};
pub use json_codec::{JsonDeserializer, JsonDeserializerConfig, JsonSerializer};
pub use numeric_codec::{DoubleDeserializer, DoubleSerializer, IntegerDeserializer, IntegerSerializer};
pub use string_codec::{StringDeserializer, StringSerializer};

/// Wire formats shipped with this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecFormat {
    Bytes,
    String,
    Integer,
    Double,
    Json,
    Bincode,
}

impl CodecFormat {
    pub const ALL: [CodecFormat; 6] = [
        CodecFormat::Bytes,
        CodecFormat::String,
        CodecFormat::Integer,
        CodecFormat::Double,
        CodecFormat::Json,
        CodecFormat::Bincode,
    ];

    /// Whether the format can produce several records from one payload.
    pub fn supports_split(&self) -> bool {
        matches!(self, CodecFormat::Json)
    }
}

impl fmt::Display for CodecFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecFormat::Bytes => write!(f, "bytes"),
            CodecFormat::String => write!(f, "string"),
            CodecFormat::Integer => write!(f, "integer"),
            CodecFormat::Double => write!(f, "double"),
            CodecFormat::Json => write!(f, "json"),
            CodecFormat::Bincode => write!(f, "bincode"),
        }
    }
}

impl std::str::FromStr for CodecFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bytes" => Ok(CodecFormat::Bytes),
            "string" => Ok(CodecFormat::String),
            "integer" => Ok(CodecFormat::Integer),
            "double" => Ok(CodecFormat::Double),
            "json" => Ok(CodecFormat::Json),
            "bincode" => Ok(CodecFormat::Bincode),
            _ => Err(ConfigError::UnsupportedFormat(s.to_string())),
        }
    }
}
