use crate::context::SerializationContext;
use crate::error::EncodeError;
use crate::value::Value;

/// Encode capability implemented by every concrete format.
///
/// The accepted shape of `value` is up to the format. On failure no bytes are
/// returned; there is no partial output.
pub trait Serializer: Send + Sync {
    fn encode(&self, ctx: &SerializationContext<'_>, value: &Value) -> Result<Vec<u8>, EncodeError>;

    /// Get the name of this format
    fn format_name(&self) -> &'static str;
}

impl<S: Serializer + ?Sized> Serializer for Box<S> {
    fn encode(&self, ctx: &SerializationContext<'_>, value: &Value) -> Result<Vec<u8>, EncodeError> {
        (**self).encode(ctx, value)
    }

    fn format_name(&self) -> &'static str {
        (**self).format_name()
    }
}

impl<S: Serializer + ?Sized> Serializer for std::sync::Arc<S> {
    fn encode(&self, ctx: &SerializationContext<'_>, value: &Value) -> Result<Vec<u8>, EncodeError> {
        (**self).encode(ctx, value)
    }

    fn format_name(&self) -> &'static str {
        (**self).format_name()
    }
}
