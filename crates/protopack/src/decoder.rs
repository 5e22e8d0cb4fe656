//! Protocol-buffer binary decoder.

use protopack_buffers::varint::{zigzag_decode32, zigzag_decode64};
use protopack_buffers::Reader;
use tracing::trace;

use crate::builder::coerce_key;
use crate::constants::{MAP_KEY_FIELD, MAP_VALUE_FIELD, MAX_FIELD_NUMBER, MAX_RECURSION_DEPTH};
use crate::error::{MalformedInput, ProtoError};
use crate::schema::{FieldKind, MapKeyKind, MessageSchema, SchemaRegistry};
use crate::value::{MapKey, MessageValue, Value};
use crate::wire::{split_tag, WireType};

/// Protocol-buffer binary decoder.
///
/// Unknown field numbers are skipped. For a scalar that occurs more than
/// once the last occurrence wins; repeated embedded messages are merged and
/// map entries accumulate. Nesting deeper than [`MAX_RECURSION_DEPTH`] is
/// rejected as malformed.
pub struct ProtoDecoder<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> ProtoDecoder<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Decodes `data` as a complete `type_name` message.
    pub fn decode(&self, type_name: &str, data: &[u8]) -> Result<MessageValue, ProtoError> {
        let schema = self.registry.lookup(type_name)?;
        let mut reader = Reader::new(data);
        self.read_message(&mut reader, schema, 0)
    }

    fn read_message(
        &self,
        reader: &mut Reader<'_>,
        schema: &MessageSchema,
        depth: usize,
    ) -> Result<MessageValue, ProtoError> {
        let mut message = MessageValue::new(schema.name());
        while !reader.is_empty() {
            let (number, wire_type) = read_tag(reader)?;
            match schema.field_by_number(number) {
                Some(field) => self.read_field(
                    reader,
                    &mut message,
                    (number, field.name.as_str(), &field.kind),
                    wire_type,
                    depth,
                )?,
                None => {
                    trace!(
                        message = schema.name(),
                        field = number,
                        wire_type = wire_type.name(),
                        "skipping unknown field"
                    );
                    skip_field(reader, number, wire_type)?;
                }
            }
        }
        Ok(message)
    }

    fn read_field(
        &self,
        reader: &mut Reader<'_>,
        message: &mut MessageValue,
        (number, name, kind): (u32, &str, &FieldKind),
        wire_type: WireType,
        depth: usize,
    ) -> Result<(), ProtoError> {
        expect_wire_type(name, kind.wire_type(), wire_type)?;
        match kind {
            FieldKind::Map {
                key: key_kind,
                value: value_kind,
            } => {
                let mut entry = read_len(reader, name)?;
                let depth = descend(depth, entry.x)?;
                let (key, value) =
                    self.read_map_entry(&mut entry, name, *key_kind, value_kind, depth)?;
                let key = coerce_key(name, *key_kind, key)?;
                message.map_mut(number).insert(key, value);
            }
            _ => match (message.remove(number), self.read_value(reader, name, kind, depth)?) {
                // Repeated occurrences of an embedded message merge.
                (Some(Value::Message(mut existing)), Value::Message(incoming)) => {
                    existing.merge_from(incoming);
                    message.put(number, Value::Message(existing));
                }
                (_, value) => message.put(number, value),
            },
        }
        Ok(())
    }

    fn read_map_entry(
        &self,
        entry: &mut Reader<'_>,
        name: &str,
        key_kind: MapKeyKind,
        value_kind: &FieldKind,
        depth: usize,
    ) -> Result<(MapKey, Value), ProtoError> {
        let key_field_kind = key_kind.as_field_kind();
        let mut key = Value::default_for(&key_field_kind);
        let mut value = Value::default_for(value_kind);
        while !entry.is_empty() {
            let (number, wire_type) = read_tag(entry)?;
            match number {
                MAP_KEY_FIELD => {
                    expect_wire_type(name, key_field_kind.wire_type(), wire_type)?;
                    key = self.read_value(entry, name, &key_field_kind, depth)?;
                }
                MAP_VALUE_FIELD => {
                    expect_wire_type(name, value_kind.wire_type(), wire_type)?;
                    let incoming = self.read_value(entry, name, value_kind, depth)?;
                    value = match (value, incoming) {
                        (Value::Message(mut existing), Value::Message(incoming)) => {
                            existing.merge_from(incoming);
                            Value::Message(existing)
                        }
                        (_, incoming) => incoming,
                    };
                }
                _ => skip_field(entry, number, wire_type)?,
            }
        }
        let key = match key {
            Value::Str(s) => MapKey::Str(s),
            Value::Bool(b) => MapKey::Bool(b),
            Value::U32(n) => MapKey::U64(n as u64),
            Value::U64(n) => MapKey::U64(n),
            other => MapKey::I64(other.as_i64().unwrap_or_default()),
        };
        Ok((key, value))
    }

    /// Reads one payload of `kind`; the tag has already been consumed.
    /// `depth` is the nesting level of the message holding the field.
    fn read_value(
        &self,
        reader: &mut Reader<'_>,
        name: &str,
        kind: &FieldKind,
        depth: usize,
    ) -> Result<Value, ProtoError> {
        let malformed = |err| ProtoError::from(MalformedInput::from_buffer(err, name));
        let out_of_range = |value: i128| ProtoError::IntegerOutOfRange {
            field: name.to_owned(),
            value,
            kind: kind.scalar_name().unwrap_or("integer"),
        };
        Ok(match kind {
            FieldKind::Int32 => {
                // Negative int32 values arrive sign-extended to 64 bits.
                let raw = reader.varint().map_err(malformed)? as i64;
                Value::I32(i32::try_from(raw).map_err(|_| out_of_range(raw as i128))?)
            }
            FieldKind::Int64 => Value::I64(reader.varint().map_err(malformed)? as i64),
            FieldKind::UInt32 => {
                let raw = reader.varint().map_err(malformed)?;
                Value::U32(u32::try_from(raw).map_err(|_| out_of_range(raw as i128))?)
            }
            FieldKind::UInt64 => Value::U64(reader.varint().map_err(malformed)?),
            FieldKind::SInt32 => {
                let raw = reader.varint().map_err(malformed)?;
                let zz = u32::try_from(raw).map_err(|_| out_of_range(raw as i128))?;
                Value::I32(zigzag_decode32(zz))
            }
            FieldKind::SInt64 => Value::I64(zigzag_decode64(reader.varint().map_err(malformed)?)),
            FieldKind::Bool => Value::Bool(reader.varint().map_err(malformed)? != 0),
            FieldKind::Float => Value::F32(reader.f32_le().map_err(malformed)?),
            FieldKind::Double => Value::F64(reader.f64_le().map_err(malformed)?),
            FieldKind::String => {
                let mut region = read_len(reader, name)?;
                let size = region.size();
                Value::Str(region.utf8(size).map_err(malformed)?.to_owned())
            }
            FieldKind::Bytes => {
                let mut region = read_len(reader, name)?;
                let size = region.size();
                Value::Bytes(region.buf(size).map_err(malformed)?.to_vec())
            }
            FieldKind::Message(type_name) => {
                let schema = self.registry.lookup(type_name)?;
                let mut region = read_len(reader, name)?;
                let depth = descend(depth, region.x)?;
                Value::Message(self.read_message(&mut region, schema, depth)?)
            }
            FieldKind::Map { .. } => {
                return Err(ProtoError::KindMismatch {
                    field: name.to_owned(),
                    expected: kind.type_name(),
                })
            }
        })
    }
}

fn read_tag(reader: &mut Reader<'_>) -> Result<(u32, WireType), ProtoError> {
    let offset = reader.x;
    let tag = reader
        .varint()
        .map_err(|err| MalformedInput::from_buffer(err, "<tag>"))?;
    let (number, bits) = split_tag(tag);
    if number == 0 || number > MAX_FIELD_NUMBER as u64 {
        return Err(MalformedInput::InvalidFieldNumber { offset }.into());
    }
    let number = number as u32;
    let wire_type = WireType::from_u8(bits).ok_or(MalformedInput::InvalidWireType {
        offset,
        wire_type: bits,
    })?;
    if matches!(wire_type, WireType::SGroup | WireType::EGroup) {
        return Err(MalformedInput::DeprecatedGroup { field: number }.into());
    }
    Ok((number, wire_type))
}

/// Nesting level one below `depth`; `offset` is where the nested payload
/// starts.
fn descend(depth: usize, offset: usize) -> Result<usize, ProtoError> {
    if depth >= MAX_RECURSION_DEPTH {
        return Err(MalformedInput::RecursionLimit { offset }.into());
    }
    Ok(depth + 1)
}

fn expect_wire_type(name: &str, expected: WireType, actual: WireType) -> Result<(), ProtoError> {
    if expected != actual {
        return Err(MalformedInput::WireTypeMismatch {
            field: name.to_owned(),
            expected,
            actual,
        }
        .into());
    }
    Ok(())
}

/// Reads a length prefix and returns a reader over exactly that region.
fn read_len<'a>(reader: &mut Reader<'a>, name: &str) -> Result<Reader<'a>, ProtoError> {
    let offset = reader.x;
    let length = reader
        .varint()
        .map_err(|err| MalformedInput::from_buffer(err, name))?;
    if length > reader.size() as u64 {
        return Err(MalformedInput::LengthOverrun {
            offset,
            length,
            remaining: reader.size(),
        }
        .into());
    }
    reader
        .cut(length as usize)
        .map_err(|err| MalformedInput::from_buffer(err, name).into())
}

fn skip_field(reader: &mut Reader<'_>, number: u32, wire_type: WireType) -> Result<(), ProtoError> {
    let name = number.to_string();
    let malformed = |err| ProtoError::from(MalformedInput::from_buffer(err, &name));
    match wire_type {
        WireType::Varint => {
            reader.varint().map_err(malformed)?;
        }
        WireType::I64 => reader.skip(8).map_err(malformed)?,
        WireType::I32 => reader.skip(4).map_err(malformed)?,
        WireType::Len => {
            read_len(reader, &name)?;
        }
        WireType::SGroup | WireType::EGroup => {
            return Err(MalformedInput::DeprecatedGroup { field: number }.into())
        }
    }
    Ok(())
}
