use std::fmt;

/// A single broker header: key and raw value bytes.
pub type MessageHeader = (String, Vec<u8>);

/// Which half of a broker message a codec is working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageField {
    Key,
    Value,
}

impl fmt::Display for MessageField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageField::Key => write!(f, "key"),
            MessageField::Value => write!(f, "value"),
        }
    }
}

/// Per-message metadata handed to every `Serializer` and `Deserializer` call.
///
/// The context borrows the topic and headers from the message being processed,
/// so it is built right before a codec call and dropped right after. Nothing is
/// copied or validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializationContext<'a> {
    topic: &'a str,
    headers: Option<&'a [MessageHeader]>,
}

impl<'a> SerializationContext<'a> {
    pub fn new(topic: &'a str, headers: Option<&'a [MessageHeader]>) -> Self {
        Self { topic, headers }
    }

    /// Context for a message that carries no headers.
    pub fn for_topic(topic: &'a str) -> Self {
        Self::new(topic, None)
    }

    pub fn topic(&self) -> &'a str {
        self.topic
    }

    pub fn headers(&self) -> Option<&'a [MessageHeader]> {
        self.headers
    }

    /// Value of the first header named `key`.
    pub fn header(&self, key: &str) -> Option<&'a [u8]> {
        self.headers?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Schema subject for one half of the message, `<topic>-key` or `<topic>-value`.
    pub fn subject(&self, field: MessageField) -> String {
        format!("{}-{}", self.topic, field)
    }
}
