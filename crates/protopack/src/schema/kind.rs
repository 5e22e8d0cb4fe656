//! Declared field kinds.

use std::fmt;

use crate::error::SchemaError;
use crate::wire::WireType;

/// The declared type of a message field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Int32,
    Int64,
    UInt32,
    UInt64,
    SInt32,
    SInt64,
    Bool,
    Float,
    Double,
    String,
    Bytes,
    /// Embedded message, referenced by registered type name.
    Message(String),
    /// `map<K, V>`, encoded as repeated `{ key = 1; value = 2; }` entries.
    Map {
        key: MapKeyKind,
        value: Box<FieldKind>,
    },
}

/// Kinds allowed as map keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKeyKind {
    String,
    Int32,
    Int64,
    UInt32,
    UInt64,
    SInt32,
    SInt64,
    Bool,
}

impl FieldKind {
    /// Wire type used for a single occurrence of this field.
    pub fn wire_type(&self) -> WireType {
        match self {
            FieldKind::Int32
            | FieldKind::Int64
            | FieldKind::UInt32
            | FieldKind::UInt64
            | FieldKind::SInt32
            | FieldKind::SInt64
            | FieldKind::Bool => WireType::Varint,
            FieldKind::Double => WireType::I64,
            FieldKind::Float => WireType::I32,
            FieldKind::String
            | FieldKind::Bytes
            | FieldKind::Message(_)
            | FieldKind::Map { .. } => WireType::Len,
        }
    }

    /// Schema-language spelling of the kind, e.g. `int32` or `map<string, Foo>`.
    pub fn type_name(&self) -> String {
        match self {
            FieldKind::Message(name) => name.clone(),
            FieldKind::Map { key, value } => format!("map<{}, {}>", key.name(), value.type_name()),
            scalar => scalar.scalar_name().unwrap_or("?").to_owned(),
        }
    }

    /// Name of a scalar kind; `None` for messages and maps.
    pub fn scalar_name(&self) -> Option<&'static str> {
        Some(match self {
            FieldKind::Int32 => "int32",
            FieldKind::Int64 => "int64",
            FieldKind::UInt32 => "uint32",
            FieldKind::UInt64 => "uint64",
            FieldKind::SInt32 => "sint32",
            FieldKind::SInt64 => "sint64",
            FieldKind::Bool => "bool",
            FieldKind::Float => "float",
            FieldKind::Double => "double",
            FieldKind::String => "string",
            FieldKind::Bytes => "bytes",
            FieldKind::Message(_) | FieldKind::Map { .. } => return None,
        })
    }

    /// Parses a scalar kind name.
    pub fn from_scalar_name(name: &str) -> Result<Self, SchemaError> {
        Ok(match name {
            "int32" => FieldKind::Int32,
            "int64" => FieldKind::Int64,
            "uint32" => FieldKind::UInt32,
            "uint64" => FieldKind::UInt64,
            "sint32" => FieldKind::SInt32,
            "sint64" => FieldKind::SInt64,
            "bool" => FieldKind::Bool,
            "float" => FieldKind::Float,
            "double" => FieldKind::Double,
            "string" => FieldKind::String,
            "bytes" => FieldKind::Bytes,
            other => return Err(SchemaError::UnknownKind(other.to_owned())),
        })
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            FieldKind::Int32
                | FieldKind::Int64
                | FieldKind::UInt32
                | FieldKind::UInt64
                | FieldKind::SInt32
                | FieldKind::SInt64
        )
    }

    /// Inclusive range of an integer kind.
    pub fn integer_range(&self) -> Option<(i128, i128)> {
        Some(match self {
            FieldKind::Int32 | FieldKind::SInt32 => (i32::MIN as i128, i32::MAX as i128),
            FieldKind::Int64 | FieldKind::SInt64 => (i64::MIN as i128, i64::MAX as i128),
            FieldKind::UInt32 => (0, u32::MAX as i128),
            FieldKind::UInt64 => (0, u64::MAX as i128),
            _ => return None,
        })
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}

impl MapKeyKind {
    pub fn name(self) -> &'static str {
        match self {
            MapKeyKind::String => "string",
            MapKeyKind::Int32 => "int32",
            MapKeyKind::Int64 => "int64",
            MapKeyKind::UInt32 => "uint32",
            MapKeyKind::UInt64 => "uint64",
            MapKeyKind::SInt32 => "sint32",
            MapKeyKind::SInt64 => "sint64",
            MapKeyKind::Bool => "bool",
        }
    }

    /// The field kind used for the key inside a map entry.
    pub fn as_field_kind(self) -> FieldKind {
        match self {
            MapKeyKind::String => FieldKind::String,
            MapKeyKind::Int32 => FieldKind::Int32,
            MapKeyKind::Int64 => FieldKind::Int64,
            MapKeyKind::UInt32 => FieldKind::UInt32,
            MapKeyKind::UInt64 => FieldKind::UInt64,
            MapKeyKind::SInt32 => FieldKind::SInt32,
            MapKeyKind::SInt64 => FieldKind::SInt64,
            MapKeyKind::Bool => FieldKind::Bool,
        }
    }

    /// Parses a key kind name; floats, bytes and messages are not keys.
    pub fn from_name(field: &str, name: &str) -> Result<Self, SchemaError> {
        Ok(match name {
            "string" => MapKeyKind::String,
            "int32" => MapKeyKind::Int32,
            "int64" => MapKeyKind::Int64,
            "uint32" => MapKeyKind::UInt32,
            "uint64" => MapKeyKind::UInt64,
            "sint32" => MapKeyKind::SInt32,
            "sint64" => MapKeyKind::SInt64,
            "bool" => MapKeyKind::Bool,
            other => {
                return Err(SchemaError::InvalidMapKey {
                    field: field.to_owned(),
                    kind: other.to_owned(),
                })
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_types() {
        assert_eq!(FieldKind::Int32.wire_type(), WireType::Varint);
        assert_eq!(FieldKind::SInt64.wire_type(), WireType::Varint);
        assert_eq!(FieldKind::Double.wire_type(), WireType::I64);
        assert_eq!(FieldKind::Float.wire_type(), WireType::I32);
        assert_eq!(FieldKind::Message("Foo".into()).wire_type(), WireType::Len);
    }

    #[test]
    fn test_type_names() {
        let kind = FieldKind::Map {
            key: MapKeyKind::String,
            value: Box::new(FieldKind::Message("AttrValue".into())),
        };
        assert_eq!(kind.to_string(), "map<string, AttrValue>");
        assert_eq!(FieldKind::from_scalar_name("sint32").unwrap(), FieldKind::SInt32);
        assert!(matches!(
            FieldKind::from_scalar_name("int128"),
            Err(SchemaError::UnknownKind(_))
        ));
        assert!(matches!(
            MapKeyKind::from_name("f", "double"),
            Err(SchemaError::InvalidMapKey { .. })
        ));
    }
}
