//! Explicit schema registry.
//!
//! Owns every known message type. Codecs hold a registry handed to them at
//! construction; there is no process-wide descriptor pool.

use std::collections::BTreeMap;

use tracing::debug;

use super::document::{MessageEntry, SchemaDocument};
use super::{FieldKind, MessageSchema};
use crate::error::SchemaError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRegistry {
    messages: BTreeMap<String, MessageSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message type. Type names are unique within a registry.
    pub fn register(&mut self, schema: MessageSchema) -> Result<(), SchemaError> {
        if self.messages.contains_key(schema.name()) {
            return Err(SchemaError::DuplicateMessageType(schema.name().to_owned()));
        }
        debug!(
            message = schema.name(),
            fields = schema.fields().len(),
            "registered message schema"
        );
        self.messages.insert(schema.name().to_owned(), schema);
        Ok(())
    }

    /// Chaining form of [`register`](Self::register).
    pub fn with(mut self, schema: MessageSchema) -> Result<Self, SchemaError> {
        self.register(schema)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&MessageSchema> {
        self.messages.get(name)
    }

    pub fn lookup(&self, name: &str) -> Result<&MessageSchema, SchemaError> {
        self.get(name)
            .ok_or_else(|| SchemaError::UnknownMessageType(name.to_owned()))
    }

    /// Registered type names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Checks that every message reference, including map values, names a
    /// registered type.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for schema in self.messages.values() {
            for field in schema.fields() {
                let target = match &field.kind {
                    FieldKind::Message(name) => Some(name),
                    FieldKind::Map { value, .. } => match value.as_ref() {
                        FieldKind::Message(name) => Some(name),
                        _ => None,
                    },
                    _ => None,
                };
                if let Some(name) = target {
                    if !self.messages.contains_key(name) {
                        return Err(SchemaError::UnknownMessageType(name.clone()));
                    }
                }
            }
        }
        Ok(())
    }

    /// Builds and validates a registry from a descriptor document.
    pub fn from_document(document: &SchemaDocument) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        for entry in &document.messages {
            registry.register(entry.to_schema()?)?;
        }
        registry.validate()?;
        Ok(registry)
    }

    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Self::from_document(&SchemaDocument::from_json_str(json)?)
    }

    pub fn to_document(&self) -> SchemaDocument {
        SchemaDocument {
            messages: self.messages.values().map(MessageEntry::from_schema).collect(),
        }
    }
}
