//! Message schemas: an enumerated field table per message type.

use std::collections::HashMap;

use super::FieldKind;
use crate::constants::{MAX_FIELD_NUMBER, MIN_FIELD_NUMBER, RESERVED_FIELD_NUMBERS};
use crate::error::SchemaError;

/// One declared field of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub number: u32,
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(number: u32, name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            number,
            name: name.into(),
            kind,
        }
    }
}

/// A validated message type: unique field numbers and names, fields sorted
/// by number.
#[derive(Debug, Clone)]
pub struct MessageSchema {
    name: String,
    fields: Vec<FieldDescriptor>,
    by_number: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
}

impl PartialEq for MessageSchema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

impl MessageSchema {
    pub fn builder(name: impl Into<String>) -> MessageSchemaBuilder {
        MessageSchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in ascending field-number order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field_by_number(&self, number: u32) -> Option<&FieldDescriptor> {
        self.by_number.get(&number).map(|&i| &self.fields[i])
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }
}

/// Collects fields and validates them in [`build`](MessageSchemaBuilder::build).
#[derive(Debug, Clone)]
pub struct MessageSchemaBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl MessageSchemaBuilder {
    pub fn field(mut self, number: u32, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDescriptor::new(number, name, kind));
        self
    }

    pub fn push(&mut self, descriptor: FieldDescriptor) {
        self.fields.push(descriptor);
    }

    pub fn build(self) -> Result<MessageSchema, SchemaError> {
        let MessageSchemaBuilder { name, mut fields } = self;

        let mut by_number: HashMap<u32, usize> = HashMap::with_capacity(fields.len());
        let mut by_name: HashMap<String, usize> = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            if !(MIN_FIELD_NUMBER..=MAX_FIELD_NUMBER).contains(&field.number)
                || RESERVED_FIELD_NUMBERS.contains(&field.number)
            {
                return Err(SchemaError::InvalidFieldNumber {
                    message: name,
                    number: field.number,
                });
            }
            if let FieldKind::Map { value, .. } = &field.kind {
                if matches!(**value, FieldKind::Map { .. }) {
                    return Err(SchemaError::NestedMap {
                        field: format!("{name}.{}", field.name),
                    });
                }
            }
            if by_number.insert(field.number, i).is_some() {
                return Err(SchemaError::FieldNumberCollision {
                    message: name,
                    number: field.number,
                });
            }
            if by_name.insert(field.name.clone(), i).is_some() {
                return Err(SchemaError::FieldNameCollision {
                    message: name,
                    name: field.name.clone(),
                });
            }
        }

        fields.sort_by_key(|f| f.number);
        let by_number: HashMap<u32, usize> =
            fields.iter().enumerate().map(|(i, f)| (f.number, i)).collect();
        let by_name: HashMap<String, usize> = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();

        Ok(MessageSchema {
            name,
            fields,
            by_number,
            by_name,
        })
    }
}
