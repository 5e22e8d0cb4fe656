//! Runtime message values.

use std::collections::BTreeMap;

use crate::schema::FieldKind;

/// A field value.
///
/// Integer kinds map onto one variant per width and signedness: `int32` and
/// `sint32` are both held as [`Value::I32`]; the field kind decides how the
/// value is encoded.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    Bool(bool),
    F32(f32),
    F64(f64),
    Str(String),
    Bytes(Vec<u8>),
    Message(MessageValue),
    Map(BTreeMap<MapKey, Value>),
}

/// A map key. Integer keys are widened so every key kind orders within one
/// type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    Bool(bool),
    I64(i64),
    U64(u64),
    Str(String),
}

impl Value {
    /// Whether this is the proto3 default for its type, which is never
    /// stored or serialized. Messages always count as present.
    pub fn is_default(&self) -> bool {
        match self {
            Value::I32(v) => *v == 0,
            Value::I64(v) => *v == 0,
            Value::U32(v) => *v == 0,
            Value::U64(v) => *v == 0,
            Value::Bool(v) => !*v,
            // -0.0 has a non-zero bit pattern and is kept.
            Value::F32(v) => v.to_bits() == 0,
            Value::F64(v) => v.to_bits() == 0,
            Value::Str(v) => v.is_empty(),
            Value::Bytes(v) => v.is_empty(),
            Value::Map(v) => v.is_empty(),
            Value::Message(_) => false,
        }
    }

    /// The zero value of a kind, or an empty message / map.
    pub fn default_for(kind: &FieldKind) -> Value {
        match kind {
            FieldKind::Int32 | FieldKind::SInt32 => Value::I32(0),
            FieldKind::Int64 | FieldKind::SInt64 => Value::I64(0),
            FieldKind::UInt32 => Value::U32(0),
            FieldKind::UInt64 => Value::U64(0),
            FieldKind::Bool => Value::Bool(false),
            FieldKind::Float => Value::F32(0.0),
            FieldKind::Double => Value::F64(0.0),
            FieldKind::String => Value::Str(String::new()),
            FieldKind::Bytes => Value::Bytes(Vec::new()),
            FieldKind::Message(name) => Value::Message(MessageValue::new(name.clone())),
            FieldKind::Map { .. } => Value::Map(BTreeMap::new()),
        }
    }

    /// Integer payload widened to `i128`, for range checks.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::I32(v) => Some(*v as i128),
            Value::I64(v) => Some(*v as i128),
            Value::U32(v) => Some(*v as i128),
            Value::U64(v) => Some(*v as i128),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|v| i64::try_from(v).ok())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&MessageValue> {
        match self {
            Value::Message(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<MapKey, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Short description of the variant, for error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Value::I32(_) | Value::I64(_) | Value::U32(_) | Value::U64(_) => "integer",
            Value::Bool(_) => "bool",
            Value::F32(_) | Value::F64(_) => "float",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Message(_) => "message",
            Value::Map(_) => "map",
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_value! {
    i32 => I32,
    i64 => I64,
    u32 => U32,
    u64 => U64,
    bool => Bool,
    f32 => F32,
    f64 => F64,
    String => Str,
    Vec<u8> => Bytes,
    MessageValue => Message,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<BTreeMap<MapKey, Value>> for Value {
    fn from(v: BTreeMap<MapKey, Value>) -> Self {
        Value::Map(v)
    }
}

impl From<&str> for MapKey {
    fn from(v: &str) -> Self {
        MapKey::Str(v.to_owned())
    }
}

impl From<String> for MapKey {
    fn from(v: String) -> Self {
        MapKey::Str(v)
    }
}

impl From<bool> for MapKey {
    fn from(v: bool) -> Self {
        MapKey::Bool(v)
    }
}

impl From<i32> for MapKey {
    fn from(v: i32) -> Self {
        MapKey::I64(v as i64)
    }
}

impl From<i64> for MapKey {
    fn from(v: i64) -> Self {
        MapKey::I64(v)
    }
}

impl From<u32> for MapKey {
    fn from(v: u32) -> Self {
        MapKey::U64(v as u64)
    }
}

impl From<u64> for MapKey {
    fn from(v: u64) -> Self {
        MapKey::U64(v)
    }
}

impl MapKey {
    /// Integer payload widened to `i128`, for range checks.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            MapKey::I64(v) => Some(*v as i128),
            MapKey::U64(v) => Some(*v as i128),
            _ => None,
        }
    }
}

/// A message instance: present fields keyed by field number.
///
/// Only non-default values are held, so two messages that differ only in
/// explicitly-set zero values compare equal and serialize identically.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageValue {
    type_name: String,
    fields: BTreeMap<u32, Value>,
}

impl MessageValue {
    /// An empty message of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn get(&self, number: u32) -> Option<&Value> {
        self.fields.get(&number)
    }

    /// Stored value, or the zero value of `kind` when the field is absent.
    pub fn get_or_default(&self, number: u32, kind: &FieldKind) -> Value {
        self.fields
            .get(&number)
            .cloned()
            .unwrap_or_else(|| Value::default_for(kind))
    }

    /// Present fields in ascending field-number order.
    pub fn fields(&self) -> impl Iterator<Item = (u32, &Value)> {
        self.fields.iter().map(|(n, v)| (*n, v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Stores `value`, or clears the field when `value` is a default.
    pub(crate) fn put(&mut self, number: u32, value: Value) {
        if value.is_default() {
            self.fields.remove(&number);
        } else {
            self.fields.insert(number, value);
        }
    }

    pub(crate) fn remove(&mut self, number: u32) -> Option<Value> {
        self.fields.remove(&number)
    }

    /// Map stored at `number`, created empty when absent. Callers must not
    /// leave it empty.
    pub(crate) fn map_mut(&mut self, number: u32) -> &mut BTreeMap<MapKey, Value> {
        let slot = self
            .fields
            .entry(number)
            .or_insert_with(|| Value::Map(BTreeMap::new()));
        if !matches!(slot, Value::Map(_)) {
            *slot = Value::Map(BTreeMap::new());
        }
        match slot {
            Value::Map(map) => map,
            _ => unreachable!("slot was just set to a map"),
        }
    }

    /// Merges `other` into `self` with protobuf semantics: scalars are
    /// replaced, embedded messages merge recursively and maps take the union,
    /// with `other` winning on equal keys.
    pub fn merge_from(&mut self, other: MessageValue) {
        for (number, value) in other.fields {
            match (self.fields.get_mut(&number), value) {
                (Some(Value::Message(existing)), Value::Message(incoming)) => {
                    existing.merge_from(incoming);
                }
                (Some(Value::Map(existing)), Value::Map(incoming)) => {
                    existing.extend(incoming);
                }
                (_, value) => self.put(number, value),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_drops_defaults() {
        let mut m = MessageValue::new("Foo");
        m.put(1, Value::I32(5));
        assert_eq!(m.get(1), Some(&Value::I32(5)));
        m.put(1, Value::I32(0));
        assert!(m.get(1).is_none());
        m.put(2, Value::Str(String::new()));
        assert!(m.is_empty());
        m.put(3, Value::F64(-0.0));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_empty_message_is_present() {
        let mut m = MessageValue::new("AttrValue");
        m.put(10, Value::Message(MessageValue::new("NameAttrList")));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_merge_from() {
        let mut inner_a = MessageValue::new("Inner");
        inner_a.put(1, Value::I32(1));
        let mut a = MessageValue::new("Outer");
        a.put(1, Value::I32(7));
        a.put(2, Value::Message(inner_a));
        a.map_mut(3).insert(MapKey::from("x"), Value::I32(1));

        let mut inner_b = MessageValue::new("Inner");
        inner_b.put(2, Value::I32(2));
        let mut b = MessageValue::new("Outer");
        b.put(1, Value::I32(8));
        b.put(2, Value::Message(inner_b));
        b.map_mut(3).insert(MapKey::from("y"), Value::I32(2));

        a.merge_from(b);
        assert_eq!(a.get(1), Some(&Value::I32(8)));
        let inner = a.get(2).and_then(Value::as_message).unwrap();
        assert_eq!(inner.len(), 2);
        assert_eq!(a.get(3).and_then(Value::as_map).unwrap().len(), 2);
    }

    #[test]
    fn test_map_keys_order() {
        let mut keys = vec![
            MapKey::from("bb"),
            MapKey::from("aa"),
            MapKey::from(-1i64),
            MapKey::from(true),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                MapKey::Bool(true),
                MapKey::I64(-1),
                MapKey::from("aa"),
                MapKey::from("bb"),
            ]
        );
    }
}
