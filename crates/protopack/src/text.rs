//! Human-readable text rendering.
//!
//! Output follows the protobuf text format: one `name: value` line per
//! present field in field-number order, nested blocks for embedded messages
//! and map entries, two spaces of indent per level.

use std::fmt::Write as _;

use crate::error::ProtoError;
use crate::schema::{FieldKind, MessageSchema, SchemaRegistry};
use crate::value::{MapKey, MessageValue, Value};

const INDENT: &str = "  ";

/// Renders `message` in text format. Every line ends with `\n`; an empty
/// message renders as the empty string.
pub fn to_text(registry: &SchemaRegistry, message: &MessageValue) -> Result<String, ProtoError> {
    let mut printer = TextPrinter {
        registry,
        out: String::new(),
        depth: 0,
    };
    printer.print_message(message)?;
    Ok(printer.out)
}

struct TextPrinter<'r> {
    registry: &'r SchemaRegistry,
    out: String,
    depth: usize,
}

impl TextPrinter<'_> {
    fn print_message(&mut self, message: &MessageValue) -> Result<(), ProtoError> {
        let schema = self.registry.lookup(message.type_name())?;
        for (number, value) in message.fields() {
            let Some(field) = schema.field_by_number(number) else {
                return Err(unknown_number(schema, number));
            };
            match (&field.kind, value) {
                (FieldKind::Map { value: value_kind, .. }, Value::Map(entries)) => {
                    for (k, v) in entries {
                        self.open(&field.name);
                        self.print_map_entry(value_kind, k, v, &field.name)?;
                        self.close();
                    }
                }
                (kind, value) => self.print_field(&field.name, kind, value)?,
            }
        }
        Ok(())
    }

    fn print_map_entry(
        &mut self,
        value_kind: &FieldKind,
        key: &MapKey,
        value: &Value,
        field: &str,
    ) -> Result<(), ProtoError> {
        // Zero keys and scalar values are absent from the entry message.
        let key_text = match key {
            MapKey::Str(s) if s.is_empty() => None,
            MapKey::Str(s) => Some(quote(s.as_bytes())),
            MapKey::Bool(false) | MapKey::I64(0) | MapKey::U64(0) => None,
            MapKey::Bool(true) => Some("true".to_owned()),
            MapKey::I64(n) => Some(n.to_string()),
            MapKey::U64(n) => Some(n.to_string()),
        };
        if let Some(text) = key_text {
            self.line("key", &text);
        }
        if !value.is_default() {
            self.print_field("value", value_kind, value)
                .map_err(|err| rename_field(err, field))?;
        }
        Ok(())
    }

    fn print_field(
        &mut self,
        name: &str,
        kind: &FieldKind,
        value: &Value,
    ) -> Result<(), ProtoError> {
        if let (FieldKind::Message(_), Value::Message(inner)) = (kind, value) {
            self.open(name);
            self.print_message(inner)?;
            self.close();
            return Ok(());
        }
        let text = scalar_text(kind, value).ok_or_else(|| ProtoError::KindMismatch {
            field: name.to_owned(),
            expected: kind.type_name(),
        })?;
        self.line(name, &text);
        Ok(())
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn line(&mut self, name: &str, text: &str) {
        self.indent();
        let _ = writeln!(self.out, "{name}: {text}");
    }

    fn open(&mut self, name: &str) {
        self.indent();
        let _ = writeln!(self.out, "{name} {{");
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth -= 1;
        self.indent();
        self.out.push_str("}\n");
    }
}

fn unknown_number(schema: &MessageSchema, number: u32) -> ProtoError {
    ProtoError::UnknownField {
        message: schema.name().to_owned(),
        field: number.to_string(),
    }
}

fn rename_field(err: ProtoError, field: &str) -> ProtoError {
    match err {
        ProtoError::KindMismatch { expected, .. } => ProtoError::KindMismatch {
            field: field.to_owned(),
            expected,
        },
        other => other,
    }
}

fn scalar_text(kind: &FieldKind, value: &Value) -> Option<String> {
    Some(match (kind, value) {
        (FieldKind::Int32 | FieldKind::SInt32, Value::I32(n)) => n.to_string(),
        (FieldKind::Int64 | FieldKind::SInt64, Value::I64(n)) => n.to_string(),
        (FieldKind::UInt32, Value::U32(n)) => n.to_string(),
        (FieldKind::UInt64, Value::U64(n)) => n.to_string(),
        (FieldKind::Bool, Value::Bool(b)) => b.to_string(),
        (FieldKind::Float, Value::F32(f)) => format_float(format!("{f:?}"), *f as f64),
        (FieldKind::Double, Value::F64(f)) => format_float(format!("{f:?}"), *f),
        (FieldKind::String, Value::Str(s)) => quote(s.as_bytes()),
        (FieldKind::Bytes, Value::Bytes(b)) => quote(b),
        _ => return None,
    })
}

/// Shortest round-trip form with an explicit exponent sign and at least two
/// exponent digits (`1e+16`, `1.5e-05`), or `inf`, `-inf`, `nan`.
fn format_float(debug: String, value: f64) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_owned();
    }
    let Some((mantissa, exponent)) = debug.split_once('e') else {
        return debug;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// Double-quoted C-style escape. Bytes outside printable ASCII are written
/// as three-digit octal escapes.
pub fn quote(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() + 2);
    out.push('"');
    for &byte in data {
        match byte {
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b'"' => out.push_str("\\\""),
            b'\'' => out.push_str("\\'"),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\{byte:03o}");
            }
        }
    }
    out.push('"');
    out
}
