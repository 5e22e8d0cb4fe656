//! Schema-bound message codec.

use std::sync::Arc;

use tracing::debug;

use crate::builder::MessageBuilder;
use crate::decoder::ProtoDecoder;
use crate::encoder::{message_len, ProtoEncoder};
use crate::error::ProtoError;
use crate::schema::{MessageSchema, SchemaRegistry};
use crate::value::{MessageValue, Value};
use crate::{json, text};

/// Encodes, decodes and renders messages against one [`SchemaRegistry`].
///
/// The registry is validated on construction and shared behind an [`Arc`];
/// every operation takes `&self`.
///
/// ```
/// use protopack::{samples, ProtoCodec};
///
/// let codec = ProtoCodec::new(samples::registry()?)?;
/// let foo = codec.builder("Foo")?.set("a", 1)?.set("b", 1)?.build();
/// let bytes = codec.encode(&foo)?;
/// assert_eq!(bytes, [0x08, 0x01, 0x10, 0x01]);
/// assert_eq!(codec.decode("Foo", &bytes)?, foo);
/// assert_eq!(codec.to_text(&foo)?, "a: 1\nb: 1\n");
/// # Ok::<(), protopack::ProtoError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ProtoCodec {
    registry: Arc<SchemaRegistry>,
}

impl ProtoCodec {
    pub fn new(registry: impl Into<Arc<SchemaRegistry>>) -> Result<Self, ProtoError> {
        let registry = registry.into();
        registry.validate()?;
        debug!(messages = registry.len(), "codec ready");
        Ok(Self { registry })
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    pub fn schema(&self, type_name: &str) -> Result<&MessageSchema, ProtoError> {
        Ok(self.registry.lookup(type_name)?)
    }

    /// Starts a typed builder for `type_name`.
    pub fn builder(&self, type_name: &str) -> Result<MessageBuilder<'_>, ProtoError> {
        Ok(MessageBuilder::new(self.schema(type_name)?))
    }

    /// Serializes `message`. Output is deterministic: fields in ascending
    /// number order, map entries in key order.
    pub fn encode(&self, message: &MessageValue) -> Result<Vec<u8>, ProtoError> {
        let bytes = ProtoEncoder::new().encode(&self.registry, message)?;
        debug!(message = message.type_name(), bytes = bytes.len(), "encoded message");
        Ok(bytes)
    }

    /// Size of `encode(message)` without producing it.
    pub fn encoded_len(&self, message: &MessageValue) -> Result<usize, ProtoError> {
        let schema = self.schema(message.type_name())?;
        message_len(&self.registry, schema, message)
    }

    pub fn decode(&self, type_name: &str, data: &[u8]) -> Result<MessageValue, ProtoError> {
        let message = ProtoDecoder::new(&self.registry).decode(type_name, data)?;
        debug!(
            message = type_name,
            bytes = data.len(),
            fields = message.len(),
            "decoded message"
        );
        Ok(message)
    }

    pub fn to_text(&self, message: &MessageValue) -> Result<String, ProtoError> {
        text::to_text(&self.registry, message)
    }

    pub fn to_json(&self, message: &MessageValue) -> Result<serde_json::Value, ProtoError> {
        json::to_json(&self.registry, message)
    }

    pub fn from_json(
        &self,
        type_name: &str,
        json: &serde_json::Value,
    ) -> Result<MessageValue, ProtoError> {
        json::from_json(&self.registry, type_name, json)
    }

    /// Reads a field by name; absent fields yield their zero value.
    pub fn get(&self, message: &MessageValue, name: &str) -> Result<Value, ProtoError> {
        let schema = self.schema(message.type_name())?;
        let field = schema
            .field_by_name(name)
            .ok_or_else(|| ProtoError::UnknownField {
                message: schema.name().to_owned(),
                field: name.to_owned(),
            })?;
        Ok(message.get_or_default(field.number, &field.kind))
    }
}
