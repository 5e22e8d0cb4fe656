//! Typed message construction against a schema.
//!
//! Every value passes through [`coerce`], which checks shape against the
//! declared kind and range-checks integers. Out-of-range integers are an
//! error, never truncated.

use std::collections::BTreeMap;

use crate::error::ProtoError;
use crate::schema::{FieldDescriptor, FieldKind, MapKeyKind, MessageSchema};
use crate::value::{MapKey, MessageValue, Value};

/// Builds a [`MessageValue`] field by field.
///
/// ```
/// use protopack::{samples, ProtoCodec};
///
/// let codec = ProtoCodec::new(samples::registry()?)?;
/// let foo = codec
///     .builder("Foo")?
///     .set("a", 1)?
///     .set("b", -1)?
///     .insert("f", "aa", 1)?
///     .build();
/// assert_eq!(foo.len(), 3);
/// # Ok::<(), protopack::ProtoError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MessageBuilder<'a> {
    schema: &'a MessageSchema,
    message: MessageValue,
}

impl<'a> MessageBuilder<'a> {
    pub fn new(schema: &'a MessageSchema) -> Self {
        Self {
            schema,
            message: MessageValue::new(schema.name()),
        }
    }

    pub fn schema(&self) -> &'a MessageSchema {
        self.schema
    }

    fn field(&self, name: &str) -> Result<&'a FieldDescriptor, ProtoError> {
        self.schema
            .field_by_name(name)
            .ok_or_else(|| ProtoError::UnknownField {
                message: self.schema.name().to_owned(),
                field: name.to_owned(),
            })
    }

    /// Sets a field. Zero values clear the field.
    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Result<Self, ProtoError> {
        let field = self.field(name)?;
        let value = coerce(&field.name, &field.kind, value.into())?;
        self.message.put(field.number, value);
        Ok(self)
    }

    /// Sets an integer field from an `i64`, checking the declared width.
    pub fn set_int(self, name: &str, value: i64) -> Result<Self, ProtoError> {
        self.set(name, Value::I64(value))
    }

    /// Sets an embedded message field.
    pub fn set_message(self, name: &str, value: MessageValue) -> Result<Self, ProtoError> {
        self.set(name, Value::Message(value))
    }

    /// Adds one entry to a map field.
    pub fn insert(
        mut self,
        name: &str,
        key: impl Into<MapKey>,
        value: impl Into<Value>,
    ) -> Result<Self, ProtoError> {
        let field = self.field(name)?;
        let FieldKind::Map {
            key: key_kind,
            value: value_kind,
        } = &field.kind
        else {
            return Err(ProtoError::KindMismatch {
                field: field.name.clone(),
                expected: field.kind.type_name(),
            });
        };
        let key = coerce_key(&field.name, *key_kind, key.into())?;
        let value = coerce(&field.name, value_kind, value.into())?;
        self.message.map_mut(field.number).insert(key, value);
        Ok(self)
    }

    /// Clears a field.
    pub fn clear(mut self, name: &str) -> Result<Self, ProtoError> {
        let field = self.field(name)?;
        self.message.remove(field.number);
        Ok(self)
    }

    pub fn build(self) -> MessageValue {
        self.message
    }
}

fn mismatch(field: &str, kind: &FieldKind) -> ProtoError {
    ProtoError::KindMismatch {
        field: field.to_owned(),
        expected: kind.type_name(),
    }
}

fn out_of_range(field: &str, value: i128, kind: &FieldKind) -> ProtoError {
    ProtoError::IntegerOutOfRange {
        field: field.to_owned(),
        value,
        kind: kind.scalar_name().unwrap_or("integer"),
    }
}

/// Converts `value` to the canonical variant for `kind`.
///
/// Integers of any width are accepted for any integer kind if they fit.
/// `f32` widens to `double`. Map values are checked entry by entry.
pub fn coerce(field: &str, kind: &FieldKind, value: Value) -> Result<Value, ProtoError> {
    if kind.is_integer() {
        let Some(n) = value.as_i128() else {
            return Err(mismatch(field, kind));
        };
        let (min, max) = kind.integer_range().unwrap_or((0, -1));
        if n < min || n > max {
            return Err(out_of_range(field, n, kind));
        }
        return Ok(match kind {
            FieldKind::Int32 | FieldKind::SInt32 => Value::I32(n as i32),
            FieldKind::Int64 | FieldKind::SInt64 => Value::I64(n as i64),
            FieldKind::UInt32 => Value::U32(n as u32),
            _ => Value::U64(n as u64),
        });
    }
    match (kind, value) {
        (FieldKind::Bool, v @ Value::Bool(_)) => Ok(v),
        (FieldKind::Float, v @ Value::F32(_)) => Ok(v),
        (FieldKind::Double, Value::F32(f)) => Ok(Value::F64(f as f64)),
        (FieldKind::Double, v @ Value::F64(_)) => Ok(v),
        (FieldKind::String, v @ Value::Str(_)) => Ok(v),
        (FieldKind::Bytes, v @ Value::Bytes(_)) => Ok(v),
        (FieldKind::Bytes, Value::Str(s)) => Ok(Value::Bytes(s.into_bytes())),
        (FieldKind::Message(expected), Value::Message(m)) => {
            if m.type_name() != expected {
                return Err(ProtoError::MessageTypeMismatch {
                    expected: expected.clone(),
                    actual: m.type_name().to_owned(),
                });
            }
            Ok(Value::Message(m))
        }
        (FieldKind::Map { key, value }, Value::Map(entries)) => {
            let mut out = BTreeMap::new();
            for (k, v) in entries {
                out.insert(coerce_key(field, *key, k)?, coerce(field, value, v)?);
            }
            Ok(Value::Map(out))
        }
        _ => Err(mismatch(field, kind)),
    }
}

/// Converts a map key to the canonical variant for `kind`.
pub fn coerce_key(field: &str, kind: MapKeyKind, key: MapKey) -> Result<MapKey, ProtoError> {
    let field_kind = kind.as_field_kind();
    match (kind, key) {
        (MapKeyKind::String, k @ MapKey::Str(_)) => Ok(k),
        (MapKeyKind::Bool, k @ MapKey::Bool(_)) => Ok(k),
        (MapKeyKind::String | MapKeyKind::Bool, _) => Err(mismatch(field, &field_kind)),
        (_, key) => {
            let Some(n) = key.as_i128() else {
                return Err(mismatch(field, &field_kind));
            };
            let (min, max) = field_kind.integer_range().unwrap_or((0, -1));
            if n < min || n > max {
                return Err(out_of_range(field, n, &field_kind));
            }
            Ok(match kind {
                MapKeyKind::UInt32 | MapKeyKind::UInt64 => MapKey::U64(n as u64),
                _ => MapKey::I64(n as i64),
            })
        }
    }
}
