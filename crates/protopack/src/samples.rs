//! Built-in sample schemas.
//!
//! `Foo` exercises signed 32-bit fields and a string-keyed map;
//! `AttrValue` and `NameAttrList` follow the TensorFlow attribute protos and
//! exercise 64-bit integers, strings and a map of nested messages.

use crate::error::SchemaError;
use crate::schema::{FieldKind, MapKeyKind, MessageSchema, SchemaRegistry};

/// `message Foo { int32 a = 1; int32 b = 2; map<string, int32> f = 3; }`
pub fn foo_schema() -> Result<MessageSchema, SchemaError> {
    MessageSchema::builder("Foo")
        .field(1, "a", FieldKind::Int32)
        .field(2, "b", FieldKind::Int32)
        .field(
            3,
            "f",
            FieldKind::Map {
                key: MapKeyKind::String,
                value: Box::new(FieldKind::Int32),
            },
        )
        .build()
}

/// The scalar subset of `tensorflow.AttrValue`, plus its `func` field.
pub fn attr_value_schema() -> Result<MessageSchema, SchemaError> {
    MessageSchema::builder("AttrValue")
        .field(2, "s", FieldKind::Bytes)
        .field(3, "i", FieldKind::Int64)
        .field(4, "f", FieldKind::Float)
        .field(5, "b", FieldKind::Bool)
        .field(9, "placeholder", FieldKind::String)
        .field(10, "func", FieldKind::Message("NameAttrList".into()))
        .build()
}

/// `message NameAttrList { string name = 1; map<string, AttrValue> attr = 2; }`
pub fn name_attr_list_schema() -> Result<MessageSchema, SchemaError> {
    MessageSchema::builder("NameAttrList")
        .field(1, "name", FieldKind::String)
        .field(
            2,
            "attr",
            FieldKind::Map {
                key: MapKeyKind::String,
                value: Box::new(FieldKind::Message("AttrValue".into())),
            },
        )
        .build()
}

/// A validated registry holding every sample schema.
pub fn registry() -> Result<SchemaRegistry, SchemaError> {
    let registry = SchemaRegistry::new()
        .with(foo_schema()?)?
        .with(attr_value_schema()?)?
        .with(name_attr_list_schema()?)?;
    registry.validate()?;
    Ok(registry)
}
