//! Message schemas and the registry that owns them.

mod document;
mod kind;
mod message;
mod registry;

pub use document::{FieldEntry, MessageEntry, SchemaDocument};
pub use kind::{FieldKind, MapKeyKind};
pub use message::{FieldDescriptor, MessageSchema, MessageSchemaBuilder};
pub use registry::SchemaRegistry;
