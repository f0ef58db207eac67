use std::fmt;

/// Result alias used by the runtime-facing helpers of this crate.
pub type CResult<T> = Result<T, Error>;

/// Errors raised while turning payload bytes into records.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The format needs bytes but the payload was empty.
    Empty,
    /// The payload is shorter (or longer) than the format's fixed width.
    Truncated { expected: usize, actual: usize },
    /// The payload can't be parsed by the format.
    Malformed(String),
    /// The payload parsed but doesn't match the expected schema.
    SchemaMismatch(String),
    /// The result shape disagrees with the deserializer's `split_values` declaration.
    ShapeMismatch { split_values: bool },
    /// A schema needed for decoding could not be resolved.
    Schema(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Empty => write!(f, "Cannot decode an empty payload"),
            DecodeError::Truncated { expected, actual } => {
                write!(f, "Invalid payload length: expected {} bytes, got {}", expected, actual)
            }
            DecodeError::Malformed(msg) => write!(f, "Malformed payload: {}", msg),
            DecodeError::SchemaMismatch(msg) => write!(f, "Payload does not match schema: {}", msg),
            DecodeError::ShapeMismatch { split_values } => {
                if *split_values {
                    write!(f, "Deserializer declares split_values but returned a single value")
                } else {
                    write!(f, "Deserializer returned a sequence but does not declare split_values")
                }
            }
            DecodeError::Schema(msg) => write!(f, "Schema lookup failed: {}", msg),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Errors raised while turning a value into payload bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// The format has no representation for this kind of value.
    UnsupportedValue { format: &'static str, kind: &'static str },
    /// The value has the right kind but doesn't fit the wire type.
    OutOfRange(String),
    /// The encoded form would exceed the configured size limit.
    SizeLimitExceeded { limit: u64 },
    /// The value violates the schema registered for the subject.
    SchemaViolation(String),
    /// Any other failure reported by the underlying encoder.
    Failed(String),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::UnsupportedValue { format, kind } => {
                write!(f, "The {} format cannot encode a value of kind '{}'", format, kind)
            }
            EncodeError::OutOfRange(msg) => write!(f, "Value out of range: {}", msg),
            EncodeError::SizeLimitExceeded { limit } => {
                write!(f, "Encoded value exceeds the size limit of {} bytes", limit)
            }
            EncodeError::SchemaViolation(msg) => write!(f, "Value violates schema: {}", msg),
            EncodeError::Failed(msg) => write!(f, "Encoding operation failed: {}", msg),
        }
    }
}

impl std::error::Error for EncodeError {}

/// Errors detected while building a codec, before any message is processed.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidColumnName(String),
    UnsupportedFormat(String),
    InvalidOption(String),
    Load(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidColumnName(name) => write!(f, "Invalid column name: {:?}", name),
            ConfigError::UnsupportedFormat(format) => write!(f, "Unsupported codec format: {}", format),
            ConfigError::InvalidOption(msg) => write!(f, "Invalid codec option: {}", msg),
            ConfigError::Load(msg) => write!(f, "Failed to load codec config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load(err.to_string())
    }
}

/// Crate level error, returned by the registry and other runtime-facing helpers.
#[derive(Debug)]
pub enum Error {
    Decode(DecodeError),
    Encode(EncodeError),
    Config(ConfigError),
    /// No codec is registered for the topic and no default is set.
    NoCodec(String),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Decode(err) => write!(f, "{}", err),
            Error::Encode(err) => write!(f, "{}", err),
            Error::Config(err) => write!(f, "{}", err),
            Error::NoCodec(topic) => write!(f, "No codec registered for topic '{}'", topic),
            Error::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Decode(err) => Some(err),
            Error::Encode(err) => Some(err),
            Error::Config(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::NoCodec(_) => None,
        }
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Error::Decode(err)
    }
}

impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Self {
        Error::Encode(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        assert_eq!(DecodeError::Empty.to_string(), "Cannot decode an empty payload");
        assert_eq!(
            DecodeError::Truncated { expected: 4, actual: 3 }.to_string(),
            "Invalid payload length: expected 4 bytes, got 3"
        );
        assert!(DecodeError::ShapeMismatch { split_values: true }
            .to_string()
            .contains("split_values"));
    }

    #[test]
    fn test_encode_error_display() {
        let err = EncodeError::UnsupportedValue { format: "integer", kind: "string" };
        assert_eq!(err.to_string(), "The integer format cannot encode a value of kind 'string'");
        assert_eq!(
            EncodeError::SizeLimitExceeded { limit: 16 }.to_string(),
            "Encoded value exceeds the size limit of 16 bytes"
        );
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = DecodeError::Empty.into();
        assert!(matches!(err, Error::Decode(DecodeError::Empty)));
        assert!(std::error::Error::source(&err).is_some());

        let err: Error = ConfigError::UnsupportedFormat("xml".to_string()).into();
        assert_eq!(err.to_string(), "Unsupported codec format: xml");

        let err = Error::NoCodec("orders".to_string());
        assert!(std::error::Error::source(&err).is_none());
    }
}
