//! Protocol-buffer binary encoder.
//!
//! Fields are written in ascending field-number order. Nested messages and
//! map entries are length-prefixed: one sizing pass records every prefix,
//! then the write pass consumes them in the same order.

use protopack_buffers::varint::{varint_len, zigzag_encode32, zigzag_encode64};
use protopack_buffers::Writer;

use crate::builder::coerce;
use crate::constants::{MAP_KEY_FIELD, MAP_VALUE_FIELD};
use crate::error::ProtoError;
use crate::schema::{FieldKind, MessageSchema, SchemaRegistry};
use crate::value::{MapKey, MessageValue, Value};
use crate::wire::{make_tag, WireType};

/// Protocol-buffer binary encoder.
///
/// Owns a [`Writer`]; the typed `write_*` methods append a single payload
/// without a tag.
pub struct ProtoEncoder {
    pub writer: Writer,
    /// Length prefixes of nested messages and map entries, in write order.
    sizes: Vec<usize>,
    cursor: usize,
}

impl Default for ProtoEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtoEncoder {
    pub fn new() -> Self {
        // `encode` reserves the exact output size up front.
        Self {
            writer: Writer::with_alloc_size(0),
            sizes: Vec::new(),
            cursor: 0,
        }
    }

    /// Encodes `message` against the schemas in `registry`.
    pub fn encode(
        &mut self,
        registry: &SchemaRegistry,
        message: &MessageValue,
    ) -> Result<Vec<u8>, ProtoError> {
        let schema = registry.lookup(message.type_name())?;
        self.writer.reset();
        self.sizes.clear();
        self.cursor = 0;
        let len = measure_message(registry, schema, message, &mut self.sizes)?;
        self.writer.ensure_capacity(len);
        self.write_message(registry, schema, message)?;
        Ok(self.writer.flush())
    }

    /// Next recorded length prefix.
    fn next_len(&mut self) -> usize {
        let len = self.sizes[self.cursor];
        self.cursor += 1;
        len
    }

    // ---------------------------------------------------------------- primitives

    pub fn write_tag(&mut self, number: u32, wire_type: WireType) {
        self.writer.varint(make_tag(number, wire_type));
    }

    /// Sign-extends to 64 bits, so negative values take ten bytes.
    pub fn write_int32(&mut self, n: i32) {
        self.writer.varint(n as i64 as u64);
    }

    pub fn write_int64(&mut self, n: i64) {
        self.writer.varint(n as u64);
    }

    pub fn write_uint32(&mut self, n: u32) {
        self.writer.varint(n as u64);
    }

    pub fn write_uint64(&mut self, n: u64) {
        self.writer.varint(n);
    }

    pub fn write_sint32(&mut self, n: i32) {
        self.writer.varint(zigzag_encode32(n) as u64);
    }

    pub fn write_sint64(&mut self, n: i64) {
        self.writer.varint(zigzag_encode64(n));
    }

    pub fn write_bool(&mut self, b: bool) {
        self.writer.u8(b as u8);
    }

    pub fn write_float(&mut self, f: f32) {
        self.writer.f32_le(f);
    }

    pub fn write_double(&mut self, f: f64) {
        self.writer.f64_le(f);
    }

    /// Writes a length-prefixed byte string.
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.writer.varint(data.len() as u64);
        self.writer.buf(data);
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    // ---------------------------------------------------------------- messages

    fn write_message(
        &mut self,
        registry: &SchemaRegistry,
        schema: &MessageSchema,
        message: &MessageValue,
    ) -> Result<(), ProtoError> {
        for (number, value) in message.fields() {
            let field = schema
                .field_by_number(number)
                .ok_or_else(|| ProtoError::UnknownField {
                    message: schema.name().to_owned(),
                    field: number.to_string(),
                })?;
            self.write_field(registry, number, &field.name, &field.kind, value)?;
        }
        Ok(())
    }

    fn write_field(
        &mut self,
        registry: &SchemaRegistry,
        number: u32,
        name: &str,
        kind: &FieldKind,
        value: &Value,
    ) -> Result<(), ProtoError> {
        if let (
            FieldKind::Map {
                key: key_kind,
                value: value_kind,
            },
            Value::Map(entries),
        ) = (kind, value)
        {
            let key_kind = key_kind.as_field_kind();
            for (key, entry_value) in entries {
                let key = key_value(name, &key_kind, key)?;
                self.write_tag(number, WireType::Len);
                let entry_len = self.next_len();
                self.writer.varint(entry_len as u64);
                self.write_tag(MAP_KEY_FIELD, key_kind.wire_type());
                self.write_payload(registry, name, &key_kind, &key)?;
                self.write_tag(MAP_VALUE_FIELD, value_kind.wire_type());
                self.write_payload(registry, name, value_kind, entry_value)?;
            }
            return Ok(());
        }
        self.write_tag(number, kind.wire_type());
        self.write_payload(registry, name, kind, value)
    }

    fn write_payload(
        &mut self,
        registry: &SchemaRegistry,
        name: &str,
        kind: &FieldKind,
        value: &Value,
    ) -> Result<(), ProtoError> {
        match (kind, value) {
            (FieldKind::Int32, Value::I32(n)) => self.write_int32(*n),
            (FieldKind::SInt32, Value::I32(n)) => self.write_sint32(*n),
            (FieldKind::Int64, Value::I64(n)) => self.write_int64(*n),
            (FieldKind::SInt64, Value::I64(n)) => self.write_sint64(*n),
            (FieldKind::UInt32, Value::U32(n)) => self.write_uint32(*n),
            (FieldKind::UInt64, Value::U64(n)) => self.write_uint64(*n),
            (FieldKind::Bool, Value::Bool(b)) => self.write_bool(*b),
            (FieldKind::Float, Value::F32(f)) => self.write_float(*f),
            (FieldKind::Double, Value::F64(f)) => self.write_double(*f),
            (FieldKind::String, Value::Str(s)) => self.write_str(s),
            (FieldKind::Bytes, Value::Bytes(b)) => self.write_bytes(b),
            (FieldKind::Message(type_name), Value::Message(m)) => {
                let schema = nested_schema(registry, type_name, m)?;
                let len = self.next_len();
                self.writer.varint(len as u64);
                self.write_message(registry, schema, m)?;
            }
            _ => {
                return Err(ProtoError::KindMismatch {
                    field: name.to_owned(),
                    expected: kind.type_name(),
                })
            }
        }
        Ok(())
    }
}

fn nested_schema<'r>(
    registry: &'r SchemaRegistry,
    type_name: &str,
    message: &MessageValue,
) -> Result<&'r MessageSchema, ProtoError> {
    if message.type_name() != type_name {
        return Err(ProtoError::MessageTypeMismatch {
            expected: type_name.to_owned(),
            actual: message.type_name().to_owned(),
        });
    }
    Ok(registry.lookup(type_name)?)
}

/// A map key as the value written into the entry's key field.
fn key_value(name: &str, key_kind: &FieldKind, key: &MapKey) -> Result<Value, ProtoError> {
    let raw = match key {
        MapKey::Bool(b) => Value::Bool(*b),
        MapKey::I64(n) => Value::I64(*n),
        MapKey::U64(n) => Value::U64(*n),
        MapKey::Str(s) => Value::Str(s.clone()),
    };
    coerce(name, key_kind, raw)
}

// -------------------------------------------------------------------- sizing

/// Encoded size of `message` in bytes.
pub fn message_len(
    registry: &SchemaRegistry,
    schema: &MessageSchema,
    message: &MessageValue,
) -> Result<usize, ProtoError> {
    measure_message(registry, schema, message, &mut Vec::new())
}

/// Encoded size of `message`. The length prefix of every nested message and
/// map entry is pushed onto `sizes` in pre-order, which is write order.
fn measure_message(
    registry: &SchemaRegistry,
    schema: &MessageSchema,
    message: &MessageValue,
    sizes: &mut Vec<usize>,
) -> Result<usize, ProtoError> {
    let mut len = 0;
    for (number, value) in message.fields() {
        let field = schema
            .field_by_number(number)
            .ok_or_else(|| ProtoError::UnknownField {
                message: schema.name().to_owned(),
                field: number.to_string(),
            })?;
        len += field_len(registry, number, &field.name, &field.kind, value, sizes)?;
    }
    Ok(len)
}

/// Size of one field occurrence including its tag(s).
fn field_len(
    registry: &SchemaRegistry,
    number: u32,
    name: &str,
    kind: &FieldKind,
    value: &Value,
    sizes: &mut Vec<usize>,
) -> Result<usize, ProtoError> {
    if let (
        FieldKind::Map {
            key: key_kind,
            value: value_kind,
        },
        Value::Map(entries),
    ) = (kind, value)
    {
        let key_kind = key_kind.as_field_kind();
        let tag_len = varint_len(make_tag(number, WireType::Len));
        let mut len = 0;
        for (key, entry_value) in entries {
            let key = key_value(name, &key_kind, key)?;
            let slot = sizes.len();
            sizes.push(0);
            let entry_len = field_len(registry, MAP_KEY_FIELD, name, &key_kind, &key, sizes)?
                + field_len(registry, MAP_VALUE_FIELD, name, value_kind, entry_value, sizes)?;
            sizes[slot] = entry_len;
            len += tag_len + varint_len(entry_len as u64) + entry_len;
        }
        return Ok(len);
    }
    let tag_len = varint_len(make_tag(number, kind.wire_type()));
    Ok(tag_len + payload_len(registry, name, kind, value, sizes)?)
}

/// Size of a payload, including the length prefix of length-delimited kinds.
fn payload_len(
    registry: &SchemaRegistry,
    name: &str,
    kind: &FieldKind,
    value: &Value,
    sizes: &mut Vec<usize>,
) -> Result<usize, ProtoError> {
    Ok(match (kind, value) {
        (FieldKind::Int32, Value::I32(n)) => varint_len(*n as i64 as u64),
        (FieldKind::SInt32, Value::I32(n)) => varint_len(zigzag_encode32(*n) as u64),
        (FieldKind::Int64, Value::I64(n)) => varint_len(*n as u64),
        (FieldKind::SInt64, Value::I64(n)) => varint_len(zigzag_encode64(*n)),
        (FieldKind::UInt32, Value::U32(n)) => varint_len(*n as u64),
        (FieldKind::UInt64, Value::U64(n)) => varint_len(*n),
        (FieldKind::Bool, Value::Bool(_)) => 1,
        (FieldKind::Float, Value::F32(_)) => 4,
        (FieldKind::Double, Value::F64(_)) => 8,
        (FieldKind::String, Value::Str(s)) => varint_len(s.len() as u64) + s.len(),
        (FieldKind::Bytes, Value::Bytes(b)) => varint_len(b.len() as u64) + b.len(),
        (FieldKind::Message(type_name), Value::Message(m)) => {
            let schema = nested_schema(registry, type_name, m)?;
            let slot = sizes.len();
            sizes.push(0);
            let len = measure_message(registry, schema, m, sizes)?;
            sizes[slot] = len;
            varint_len(len as u64) + len
        }
        _ => {
            return Err(ProtoError::KindMismatch {
                field: name.to_owned(),
                expected: kind.type_name(),
            })
        }
    })
}
