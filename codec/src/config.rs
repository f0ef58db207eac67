use serde_derive::{Deserialize, Serialize};

use crate::de::{Deserializer, DeserializerConfig};
use crate::error::ConfigError;
use crate::formats::bincode_codec::MAX_SIZE_LIMIT;
use crate::formats::{
    BincodeConfig, BincodeDeserializer, BincodeSerializer, BytesDeserializer, BytesSerializer, CodecFormat,
    DoubleDeserializer, DoubleSerializer, IntegerDeserializer, IntegerSerializer, JsonDeserializer,
    JsonDeserializerConfig, JsonSerializer, StringDeserializer, StringSerializer,
};
use crate::ser::Serializer;

pub const DEFAULT_FORMAT: &str = "json";
pub const ENV_PREFIX: &str = "STREAMCODEC";

/// Codec settings for one topic, loadable from a file and the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Wire format name, see [`CodecFormat`]. default 'json'
    pub format: String,

    /// Wrap decoded values into `{column_name: value}`.
    pub column_name: Option<String>,

    /// Emit every item of a decoded array as its own record. json only, default false
    #[serde(default)]
    pub split_values: bool,

    /// Payload size limit in bytes. bincode only
    pub size_limit: Option<u64>,

    /// Topic the codec is registered for; defaults apply when unset.
    pub topic: Option<String>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            format: DEFAULT_FORMAT.to_string(),
            column_name: None,
            split_values: false,
            size_limit: None,
            topic: None,
        }
    }
}

impl CodecConfig {
    /// Load `file` (toml or json), overridden by `STREAMCODEC_*` environment variables.
    pub fn load(file: &str) -> Result<Self, ConfigError> {
        let df = CodecConfig::default();

        let loaded: CodecConfig = config::Config::builder()
            .set_default("format", df.format)?
            .set_default("split_values", df.split_values)?
            .add_source(config::File::with_name(file))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        log::info!("loaded {} codec config from '{}'", loaded.format, file);
        Ok(loaded)
    }

    pub fn get_format(&self) -> Result<CodecFormat, ConfigError> {
        self.format.parse()
    }

    pub fn set_format(&mut self, format: CodecFormat) {
        self.format = format.to_string();
    }

    /// Validate the codec configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let format = self.get_format()?;
        self.deserializer_config().validate()?;

        if self.split_values && !format.supports_split() {
            return Err(ConfigError::InvalidOption(format!(
                "split_values is not supported by the {} format",
                format
            )));
        }

        if let Some(limit) = self.size_limit {
            if format != CodecFormat::Bincode {
                return Err(ConfigError::InvalidOption(format!(
                    "size_limit is not supported by the {} format",
                    format
                )));
            }
            if limit == 0 || limit > MAX_SIZE_LIMIT {
                return Err(ConfigError::InvalidOption(format!(
                    "size_limit must be between 1 and {}",
                    MAX_SIZE_LIMIT
                )));
            }
        }

        Ok(())
    }

    fn deserializer_config(&self) -> DeserializerConfig {
        DeserializerConfig { column_name: self.column_name.clone() }
    }

    fn bincode_config(&self) -> BincodeConfig {
        BincodeConfig { base: self.deserializer_config(), size_limit: self.size_limit }
    }

    pub fn build_deserializer(&self) -> Result<Box<dyn Deserializer>, ConfigError> {
        self.validate()?;
        let base = self.deserializer_config();

        let de: Box<dyn Deserializer> = match self.get_format()? {
            CodecFormat::Bytes => Box::new(BytesDeserializer::new(base)?),
            CodecFormat::String => Box::new(StringDeserializer::new(base)?),
            CodecFormat::Integer => Box::new(IntegerDeserializer::new(base)?),
            CodecFormat::Double => Box::new(DoubleDeserializer::new(base)?),
            CodecFormat::Json => Box::new(JsonDeserializer::new(JsonDeserializerConfig {
                base,
                split_values: self.split_values,
            })?),
            CodecFormat::Bincode => Box::new(BincodeDeserializer::new(self.bincode_config())?),
        };
        Ok(de)
    }

    pub fn build_serializer(&self) -> Result<Box<dyn Serializer>, ConfigError> {
        self.validate()?;

        let ser: Box<dyn Serializer> = match self.get_format()? {
            CodecFormat::Bytes => Box::new(BytesSerializer::new()),
            CodecFormat::String => Box::new(StringSerializer::new()),
            CodecFormat::Integer => Box::new(IntegerSerializer::new()),
            CodecFormat::Double => Box::new(DoubleSerializer::new()),
            CodecFormat::Json => Box::new(JsonSerializer::new()),
            CodecFormat::Bincode => Box::new(BincodeSerializer::new(self.bincode_config())?),
        };
        Ok(ser)
    }
}
