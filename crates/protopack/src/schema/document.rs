//! JSON schema descriptor documents.
//!
//! Schemas are supplied from outside the codec. This is the serde model of
//! the descriptor file the CLI reads with `--schema`:
//!
//! ```json
//! {
//!   "messages": [
//!     { "name": "Foo", "fields": [
//!       { "number": 1, "name": "a", "type": "int32" },
//!       { "number": 3, "name": "f", "type": "map", "key": "string", "value": "int32" }
//!     ]}
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::{FieldDescriptor, FieldKind, MapKeyKind, MessageSchema};
use crate::error::SchemaError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub messages: Vec<MessageEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub number: u32,
    pub name: String,
    /// Scalar kind name, `"message"` or `"map"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Referenced type when `type` is `"message"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Map key kind when `type` is `"map"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Map value kind when `type` is `"map"`: a scalar kind or `"message"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Referenced type when `value` is `"message"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_message: Option<String>,
}

impl FieldEntry {
    fn qualified(&self, message: &str) -> String {
        format!("{message}.{}", self.name)
    }

    fn to_kind(&self, message: &str) -> Result<FieldKind, SchemaError> {
        match self.kind.as_str() {
            "message" => {
                let name = self.message.clone().ok_or_else(|| SchemaError::IncompleteField {
                    field: self.qualified(message),
                    reason: "message fields need a `message` type reference",
                })?;
                Ok(FieldKind::Message(name))
            }
            "map" => {
                let field = self.qualified(message);
                let key = self.key.as_deref().ok_or_else(|| SchemaError::IncompleteField {
                    field: field.clone(),
                    reason: "map fields need a `key` kind",
                })?;
                let value = self.value.as_deref().ok_or_else(|| SchemaError::IncompleteField {
                    field: field.clone(),
                    reason: "map fields need a `value` kind",
                })?;
                let value = match value {
                    "message" => {
                        let name =
                            self.value_message
                                .clone()
                                .ok_or_else(|| SchemaError::IncompleteField {
                                    field: field.clone(),
                                    reason: "message map values need a `value_message` reference",
                                })?;
                        FieldKind::Message(name)
                    }
                    "map" => return Err(SchemaError::NestedMap { field }),
                    scalar => FieldKind::from_scalar_name(scalar)?,
                };
                Ok(FieldKind::Map {
                    key: MapKeyKind::from_name(&field, key)?,
                    value: Box::new(value),
                })
            }
            scalar => FieldKind::from_scalar_name(scalar),
        }
    }

    fn from_descriptor(field: &FieldDescriptor) -> Self {
        let mut entry = FieldEntry {
            number: field.number,
            name: field.name.clone(),
            kind: String::new(),
            message: None,
            key: None,
            value: None,
            value_message: None,
        };
        match &field.kind {
            FieldKind::Message(name) => {
                entry.kind = "message".to_owned();
                entry.message = Some(name.clone());
            }
            FieldKind::Map { key, value } => {
                entry.kind = "map".to_owned();
                entry.key = Some(key.name().to_owned());
                match value.as_ref() {
                    FieldKind::Message(name) => {
                        entry.value = Some("message".to_owned());
                        entry.value_message = Some(name.clone());
                    }
                    scalar => entry.value = Some(scalar.type_name()),
                }
            }
            scalar => entry.kind = scalar.type_name(),
        }
        entry
    }
}

impl MessageEntry {
    pub fn to_schema(&self) -> Result<MessageSchema, SchemaError> {
        let mut builder = MessageSchema::builder(self.name.clone());
        for field in &self.fields {
            builder.push(FieldDescriptor::new(
                field.number,
                field.name.clone(),
                field.to_kind(&self.name)?,
            ));
        }
        builder.build()
    }

    pub fn from_schema(schema: &MessageSchema) -> Self {
        MessageEntry {
            name: schema.name().to_owned(),
            fields: schema.fields().iter().map(FieldEntry::from_descriptor).collect(),
        }
    }
}

impl SchemaDocument {
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
