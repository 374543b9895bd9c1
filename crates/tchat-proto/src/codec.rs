//! JSON codec for [`Message`].
//!
//! One message per logical frame. The transport supplies framing, so the
//! codec works on complete payloads only.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::Message;

/// Codec errors.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Payload is not valid JSON.
    #[error("malformed JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Payload is valid JSON but not an object.
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// Object fields do not match the envelope (e.g. `null` or a number where
    /// a string is required).
    #[error("invalid message shape: {0}")]
    Shape(#[source] serde_json::Error),

    /// Binary payload is not UTF-8.
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Serialization failed.
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Encode a message as a flat JSON object.
pub fn encode(message: &Message) -> Result<String, CodecError> {
    serde_json::to_string(message).map_err(CodecError::Encode)
}

/// Decode a JSON text payload into a message.
///
/// Only objects are accepted. Vocabulary is not validated.
pub fn decode(text: &str) -> Result<Message, CodecError> {
    let value: Value = serde_json::from_str(text).map_err(CodecError::Malformed)?;
    if !value.is_object() {
        return Err(CodecError::NotAnObject { found: json_type(&value) });
    }
    Message::deserialize(value).map_err(CodecError::Shape)
}

/// Decode a binary payload, which must be UTF-8 JSON.
pub fn decode_bytes(bytes: &[u8]) -> Result<Message, CodecError> {
    decode(std::str::from_utf8(bytes)?)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
