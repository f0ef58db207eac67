//! `streamcodec` is the encode/decode contract sitting between broker payload
//! bytes and the records a stream-processing pipeline works on.
//! Every codec call receives a [`SerializationContext`] with the message topic
//! and headers. A [`Deserializer`] turns bytes into one record or, when it
//! declares `split_values`, into several. A [`Serializer`] turns a record
//! back into bytes. Column wrapping is applied once, by the contract, for
//! every format.
//!
//! ## Getting started
//!
//! ```rust
//! use streamcodec::de::DeserializerExt;
//! use streamcodec::error::CResult;
//! use streamcodec::formats::{JsonDeserializer, JsonDeserializerConfig, JsonSerializer};
//! use streamcodec::{Records, SerializationContext, Serializer, Value};
//!
//! fn main() {
//!     run().unwrap();
//! }
//!
//! fn run() -> CResult<()> {
//!     let headers = vec![("source".to_string(), b"web".to_vec())];
//!     let ctx = SerializationContext::new("events", Some(&headers));
//!
//!     let de = JsonDeserializer::new(JsonDeserializerConfig::with_column("event").split())?;
//!     let records = de.deserialize(&ctx, br#"[{"id": 1}, {"id": 2}]"#)?;
//!     assert_eq!(records.len(), 2);
//!
//!     let ser = JsonSerializer::new();
//!     let first = records.into_vec().remove(0);
//!     assert_eq!(ser.encode(&ctx, &first)?, br#"{"event":{"id":1}}"#.to_vec());
//!
//!     let single = JsonDeserializer::default().deserialize(&ctx, b"42")?;
//!     assert_eq!(single, Records::One(Value::Int(42)));
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod de;
pub mod error;
pub mod formats;
pub mod registry;
pub mod schema;
pub mod ser;
pub mod value;

pub use crate::config::CodecConfig;
pub use crate::context::{MessageField, MessageHeader, SerializationContext};
pub use crate::de::{Decoded, Deserializer, DeserializerConfig, DeserializerExt, Records};
pub use crate::error::{CResult, ConfigError, DecodeError, EncodeError, Error};
pub use crate::formats::CodecFormat;
pub use crate::registry::CodecRegistry;
pub use crate::ser::Serializer;
pub use crate::value::Value;
