//! JSON view of messages.
//!
//! Objects are keyed by field name. 64-bit integers are written as strings,
//! bytes as standard base64, non-finite floats as `"NaN"`, `"Infinity"` and
//! `"-Infinity"`. Map keys are always strings. Absent fields are omitted;
//! `null` reads as absent.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{Map, Number, Value as JsonValue};

use crate::builder::{coerce, coerce_key};
use crate::error::ProtoError;
use crate::schema::{FieldKind, MapKeyKind, SchemaRegistry};
use crate::value::{MapKey, MessageValue, Value};

pub fn to_json(registry: &SchemaRegistry, message: &MessageValue) -> Result<JsonValue, ProtoError> {
    let schema = registry.lookup(message.type_name())?;
    let mut object = Map::new();
    for (number, value) in message.fields() {
        let field = schema
            .field_by_number(number)
            .ok_or_else(|| ProtoError::UnknownField {
                message: schema.name().to_owned(),
                field: number.to_string(),
            })?;
        let json = value_to_json(registry, &field.name, &field.kind, value)?;
        object.insert(field.name.clone(), json);
    }
    Ok(JsonValue::Object(object))
}

fn value_to_json(
    registry: &SchemaRegistry,
    field: &str,
    kind: &FieldKind,
    value: &Value,
) -> Result<JsonValue, ProtoError> {
    Ok(match (kind, value) {
        (FieldKind::Int32 | FieldKind::SInt32, Value::I32(n)) => JsonValue::from(*n),
        (FieldKind::UInt32, Value::U32(n)) => JsonValue::from(*n),
        (FieldKind::Int64 | FieldKind::SInt64, Value::I64(n)) => JsonValue::String(n.to_string()),
        (FieldKind::UInt64, Value::U64(n)) => JsonValue::String(n.to_string()),
        (FieldKind::Bool, Value::Bool(b)) => JsonValue::Bool(*b),
        (FieldKind::Float, Value::F32(f)) => float_to_json(*f as f64),
        (FieldKind::Double, Value::F64(f)) => float_to_json(*f),
        (FieldKind::String, Value::Str(s)) => JsonValue::String(s.clone()),
        (FieldKind::Bytes, Value::Bytes(b)) => JsonValue::String(STANDARD.encode(b)),
        (FieldKind::Message(_), Value::Message(m)) => to_json(registry, m)?,
        (FieldKind::Map { value: value_kind, .. }, Value::Map(entries)) => {
            let mut object = Map::new();
            for (key, value) in entries {
                let json = value_to_json(registry, field, value_kind, value)?;
                object.insert(key_to_string(key), json);
            }
            JsonValue::Object(object)
        }
        _ => {
            return Err(ProtoError::KindMismatch {
                field: field.to_owned(),
                expected: kind.type_name(),
            })
        }
    })
}

fn float_to_json(f: f64) -> JsonValue {
    match Number::from_f64(f) {
        Some(n) => JsonValue::Number(n),
        None if f.is_nan() => JsonValue::String("NaN".to_owned()),
        None if f > 0.0 => JsonValue::String("Infinity".to_owned()),
        None => JsonValue::String("-Infinity".to_owned()),
    }
}

fn key_to_string(key: &MapKey) -> String {
    match key {
        MapKey::Str(s) => s.clone(),
        MapKey::Bool(b) => b.to_string(),
        MapKey::I64(n) => n.to_string(),
        MapKey::U64(n) => n.to_string(),
    }
}

/// Reads a `type_name` message from its JSON view. Unknown field names are
/// rejected.
pub fn from_json(
    registry: &SchemaRegistry,
    type_name: &str,
    json: &JsonValue,
) -> Result<MessageValue, ProtoError> {
    let schema = registry.lookup(type_name)?;
    let JsonValue::Object(object) = json else {
        return Err(invalid(type_name, "expected a JSON object"));
    };
    let mut message = MessageValue::new(schema.name());
    for (name, item) in object {
        let field = schema
            .field_by_name(name)
            .ok_or_else(|| ProtoError::UnknownField {
                message: schema.name().to_owned(),
                field: name.clone(),
            })?;
        if item.is_null() {
            continue;
        }
        let value = value_from_json(registry, &field.name, &field.kind, item)?;
        message.put(field.number, coerce(&field.name, &field.kind, value)?);
    }
    Ok(message)
}

fn value_from_json(
    registry: &SchemaRegistry,
    field: &str,
    kind: &FieldKind,
    item: &JsonValue,
) -> Result<Value, ProtoError> {
    let mismatch = || ProtoError::KindMismatch {
        field: field.to_owned(),
        expected: kind.type_name(),
    };
    if kind.is_integer() {
        return integer_from_json(item).ok_or_else(mismatch);
    }
    Ok(match (kind, item) {
        (FieldKind::Bool, JsonValue::Bool(b)) => Value::Bool(*b),
        (FieldKind::Float, item) => Value::F32(float_from_json(item).ok_or_else(mismatch)? as f32),
        (FieldKind::Double, item) => Value::F64(float_from_json(item).ok_or_else(mismatch)?),
        (FieldKind::String, JsonValue::String(s)) => Value::Str(s.clone()),
        (FieldKind::Bytes, JsonValue::String(s)) => Value::Bytes(
            STANDARD
                .decode(s)
                .map_err(|err| invalid(field, &format!("invalid base64: {err}")))?,
        ),
        (FieldKind::Message(type_name), item) => {
            Value::Message(from_json(registry, type_name, item)?)
        }
        (FieldKind::Map { key, value }, JsonValue::Object(object)) => {
            let mut entries = BTreeMap::new();
            for (k, v) in object {
                let k = coerce_key(field, *key, key_from_string(field, *key, k)?)?;
                entries.insert(k, value_from_json(registry, field, value, v)?);
            }
            Value::Map(entries)
        }
        _ => return Err(mismatch()),
    })
}

/// Integers arrive as JSON numbers or decimal strings; range checks happen
/// in [`coerce`].
fn integer_from_json(item: &JsonValue) -> Option<Value> {
    match item {
        JsonValue::Number(n) => n
            .as_i64()
            .map(Value::I64)
            .or_else(|| n.as_u64().map(Value::U64)),
        JsonValue::String(s) => s
            .parse::<i64>()
            .ok()
            .map(Value::I64)
            .or_else(|| s.parse::<u64>().ok().map(Value::U64)),
        _ => None,
    }
}

fn float_from_json(item: &JsonValue) -> Option<f64> {
    match item {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => match s.as_str() {
            "NaN" => Some(f64::NAN),
            "Infinity" => Some(f64::INFINITY),
            "-Infinity" => Some(f64::NEG_INFINITY),
            other => other.parse().ok(),
        },
        _ => None,
    }
}

fn key_from_string(field: &str, kind: MapKeyKind, key: &str) -> Result<MapKey, ProtoError> {
    let bad_key = || invalid(field, &format!("map key `{key}` is not a valid {}", kind.name()));
    Ok(match kind {
        MapKeyKind::String => MapKey::Str(key.to_owned()),
        MapKeyKind::Bool => match key {
            "true" => MapKey::Bool(true),
            "false" => MapKey::Bool(false),
            _ => return Err(bad_key()),
        },
        MapKeyKind::UInt32 | MapKeyKind::UInt64 => MapKey::U64(key.parse().map_err(|_| bad_key())?),
        _ => MapKey::I64(key.parse().map_err(|_| bad_key())?),
    })
}

fn invalid(field: &str, reason: &str) -> ProtoError {
    ProtoError::InvalidJson {
        field: field.to_owned(),
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;
    use serde_json::json;

    #[test]
    fn test_foo_to_json() {
        let registry = samples::registry().unwrap();
        let mut foo = MessageValue::new("Foo");
        foo.put(1, Value::I32(1));
        foo.put(2, Value::I32(-1));
        foo.map_mut(3).insert(MapKey::from("bb"), Value::I32(2));
        foo.map_mut(3).insert(MapKey::from("aa"), Value::I32(1));
        let json = to_json(&registry, &foo).unwrap();
        assert_eq!(json, json!({"a": 1, "b": -1, "f": {"aa": 1, "bb": 2}}));
        assert_eq!(
            serde_json::to_string(&json).unwrap(),
            r#"{"a":1,"b":-1,"f":{"aa":1,"bb":2}}"#
        );
        assert_eq!(from_json(&registry, "Foo", &json).unwrap(), foo);
    }

    #[test]
    fn test_int64_and_bytes() {
        let registry = samples::registry().unwrap();
        let mut attr = MessageValue::new("AttrValue");
        attr.put(2, Value::Bytes(vec![0, 1, 2]));
        attr.put(3, Value::I64(i64::MIN));
        let json = to_json(&registry, &attr).unwrap();
        assert_eq!(json, json!({"s": "AAEC", "i": "-9223372036854775808"}));
        assert_eq!(from_json(&registry, "AttrValue", &json).unwrap(), attr);
    }

    #[test]
    fn test_non_finite_floats() {
        let registry = samples::registry().unwrap();
        let mut attr = MessageValue::new("AttrValue");
        attr.put(4, Value::F32(f32::NEG_INFINITY));
        let json = to_json(&registry, &attr).unwrap();
        assert_eq!(json, json!({"f": "-Infinity"}));
        assert_eq!(from_json(&registry, "AttrValue", &json).unwrap(), attr);
    }

    #[test]
    fn test_from_json_errors() {
        let registry = samples::registry().unwrap();
        assert!(matches!(
            from_json(&registry, "Foo", &json!({"zz": 1})),
            Err(ProtoError::UnknownField { .. })
        ));
        assert!(matches!(
            from_json(&registry, "Foo", &json!({"a": 2_147_483_648i64})),
            Err(ProtoError::IntegerOutOfRange { .. })
        ));
        assert!(matches!(
            from_json(&registry, "Foo", &json!({"a": "x"})),
            Err(ProtoError::KindMismatch { .. })
        ));
        assert!(matches!(
            from_json(&registry, "Foo", &json!([1])),
            Err(ProtoError::InvalidJson { .. })
        ));
        assert!(matches!(
            from_json(&registry, "AttrValue", &json!({"s": "***"})),
            Err(ProtoError::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_null_reads_as_absent() {
        let registry = samples::registry().unwrap();
        let foo = from_json(&registry, "Foo", &json!({"a": null, "b": 0})).unwrap();
        assert!(foo.is_empty());
    }
}
