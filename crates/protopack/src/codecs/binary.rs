//! Protocol-buffer binary codec wrapper.

use std::sync::Arc;

use crate::decoder::ProtoDecoder;
use crate::encoder::ProtoEncoder;
use crate::{EncodingFormat, MessageValue, SchemaRegistry};

use super::types::{CodecError, MessageCodec};

pub struct BinaryMessageCodec {
    pub encoder: ProtoEncoder,
    registry: Arc<SchemaRegistry>,
}

impl BinaryMessageCodec {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            encoder: ProtoEncoder::new(),
            registry,
        }
    }

    pub fn id(&self) -> &'static str {
        "proto"
    }

    pub fn format(&self) -> EncodingFormat {
        EncodingFormat::Binary
    }

    pub fn encode(&mut self, message: &MessageValue) -> Result<Vec<u8>, CodecError> {
        Ok(self.encoder.encode(&self.registry, message)?)
    }

    pub fn decode(&mut self, type_name: &str, bytes: &[u8]) -> Result<MessageValue, CodecError> {
        Ok(ProtoDecoder::new(&self.registry).decode(type_name, bytes)?)
    }
}

impl MessageCodec for BinaryMessageCodec {
    fn id(&self) -> &'static str {
        self.id()
    }

    fn format(&self) -> EncodingFormat {
        self.format()
    }

    fn encode(&mut self, message: &MessageValue) -> Result<Vec<u8>, CodecError> {
        self.encode(message)
    }

    fn decode(&mut self, type_name: &str, bytes: &[u8]) -> Result<MessageValue, CodecError> {
        self.decode(type_name, bytes)
    }
}
