use crate::protocol::error::Result;
use crate::protocol::{CallMessage, CallbackMessage, Message};

/// Codec for encoding/decoding bridge messages.
///
/// Currently only JSON is supported, but the enum allows for future
/// extensibility (e.g., MessagePack, CBOR, etc.).
pub enum Codec {
    /// JSON codec (currently the only supported format)
    Json(JsonCodec),
}

impl Codec {
    /// Create a new codec (JSON is the only supported format)
    pub fn new() -> Self {
        Codec::Json(JsonCodec)
    }

    /// Encode a call message to bytes
    pub fn encode_call(&self, message: &CallMessage) -> Result<Vec<u8>> {
        match self {
            Codec::Json(_) => JsonCodec::encode_call(message),
        }
    }

    /// Decode a call message from bytes
    pub fn decode_call(&self, data: &[u8]) -> Result<CallMessage> {
        match self {
            Codec::Json(_) => JsonCodec::decode_call(data),
        }
    }

    /// Encode a callback message to bytes
    pub fn encode_callback(&self, message: &CallbackMessage) -> Result<Vec<u8>> {
        match self {
            Codec::Json(_) => JsonCodec::encode_callback(message),
        }
    }

    /// Decode a callback message from bytes
    pub fn decode_callback(&self, data: &[u8]) -> Result<CallbackMessage> {
        match self {
            Codec::Json(_) => JsonCodec::decode_callback(data),
        }
    }

    /// Encode either message kind, with its envelope tag, to bytes
    pub fn encode_message(&self, message: &Message) -> Result<Vec<u8>> {
        match self {
            Codec::Json(_) => JsonCodec::encode_message(message),
        }
    }

    /// Decode either message kind from its tagged envelope
    pub fn decode_message(&self, data: &[u8]) -> Result<Message> {
        match self {
            Codec::Json(_) => JsonCodec::decode_message(data),
        }
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON codec for encoding/decoding bridge messages.
///
/// Uses JSON serialization so that the encoded form is itself an encoded
/// value tree, directly evaluable inside a script context.
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a call message to bytes
    pub fn encode_call(message: &CallMessage) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(message)?)
    }

    /// Decode a call message from bytes
    pub fn decode_call(data: &[u8]) -> Result<CallMessage> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Encode a callback message to bytes
    pub fn encode_callback(message: &CallbackMessage) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(message)?)
    }

    /// Decode a callback message from bytes
    pub fn decode_callback(data: &[u8]) -> Result<CallbackMessage> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Encode either message kind, with its envelope tag, to bytes
    pub fn encode_message(message: &Message) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(message)?)
    }

    /// Decode either message kind from its tagged envelope
    pub fn decode_message(data: &[u8]) -> Result<Message> {
        Ok(serde_json::from_slice(data)?)
    }
}
