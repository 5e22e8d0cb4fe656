//! JSON codec wrapper over the field-name keyed JSON view.

use std::sync::Arc;

use crate::json::{from_json, to_json};
use crate::{EncodingFormat, MessageValue, SchemaRegistry};

use super::types::{CodecError, MessageCodec};

pub struct JsonMessageCodec {
    registry: Arc<SchemaRegistry>,
}

impl JsonMessageCodec {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    pub fn id(&self) -> &'static str {
        "json"
    }

    pub fn format(&self) -> EncodingFormat {
        EncodingFormat::Json
    }

    pub fn encode(&mut self, message: &MessageValue) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(&to_json(&self.registry, message)?)?)
    }

    pub fn decode(&mut self, type_name: &str, bytes: &[u8]) -> Result<MessageValue, CodecError> {
        let json: serde_json::Value = serde_json::from_slice(bytes)?;
        Ok(from_json(&self.registry, type_name, &json)?)
    }
}

impl MessageCodec for JsonMessageCodec {
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
