//! Common codec trait and errors.

use crate::{EncodingFormat, MessageValue, ProtoError};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("protobuf codec error: {0}")]
    Proto(#[from] ProtoError),
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trait for codecs that encode/decode [`MessageValue`].
pub trait MessageCodec {
    fn id(&self) -> &'static str;
    fn format(&self) -> EncodingFormat;
    fn encode(&mut self, message: &MessageValue) -> Result<Vec<u8>, CodecError>;
    fn decode(&mut self, type_name: &str, bytes: &[u8]) -> Result<MessageValue, CodecError>;
}
