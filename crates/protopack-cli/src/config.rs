//! Schema loading and message construction from command-line arguments.

use std::fs;
use std::path::Path;

use protopack::{
    samples, FieldKind, MapKey, MapKeyKind, MessageBuilder, MessageValue, ProtoCodec,
    SchemaRegistry, Value,
};
use tracing::debug;

use crate::cli::MessageArgs;
use crate::error::{CliError, CliResult};

/// Builds the codec from a schema descriptor file, or from the built-in
/// samples when no file is given.
pub fn load_codec(schema: Option<&Path>) -> CliResult<ProtoCodec> {
    let registry = match schema {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| {
                CliError::Input(format!("cannot read schema {}: {e}", path.display()))
            })?;
            let registry = SchemaRegistry::from_json_str(&json)?;
            debug!(path = %path.display(), messages = registry.len(), "loaded schema descriptor");
            registry
        }
        None => samples::registry()?,
    };
    Ok(ProtoCodec::new(registry)?)
}

/// Builds the message described by `args`. `default_type` applies when no
/// `--type` is given.
pub fn build_message(
    codec: &ProtoCodec,
    args: &MessageArgs,
    default_type: &str,
) -> CliResult<MessageValue> {
    let type_name = args.type_name.as_deref().unwrap_or(default_type);
    if let Some(json) = &args.json {
        let json: serde_json::Value = serde_json::from_str(json)?;
        return Ok(codec.from_json(type_name, &json)?);
    }
    let mut builder = codec.builder(type_name)?;
    for assignment in &args.set {
        builder = apply_assignment(builder, assignment)?;
    }
    Ok(builder.build())
}

/// Applies one `name=value` (or `name=key:value` for maps) assignment.
pub fn apply_assignment<'a>(
    builder: MessageBuilder<'a>,
    assignment: &str,
) -> CliResult<MessageBuilder<'a>> {
    let (name, raw) = assignment
        .split_once('=')
        .ok_or_else(|| CliError::Usage(format!("expected NAME=VALUE, got `{assignment}`")))?;
    let kind = builder
        .schema()
        .field_by_name(name)
        .map(|field| field.kind.clone())
        .ok_or_else(|| {
            CliError::Usage(format!(
                "message `{}` has no field `{name}`",
                builder.schema().name()
            ))
        })?;
    match &kind {
        FieldKind::Map { key, value } => {
            let (raw_key, raw_value) = raw.split_once(':').ok_or_else(|| {
                CliError::Usage(format!("map field `{name}` expects KEY:VALUE, got `{raw}`"))
            })?;
            let key = parse_key(name, *key, raw_key)?;
            let value = parse_scalar(name, value, raw_value)?;
            Ok(builder.insert(name, key, value)?)
        }
        kind => Ok(builder.set(name, parse_scalar(name, kind, raw)?)?),
    }
}

/// Parses a scalar literal for `kind`. Range checks happen in the builder.
pub fn parse_scalar(field: &str, kind: &FieldKind, raw: &str) -> CliResult<Value> {
    let bad = || CliError::Usage(format!("field `{field}`: `{raw}` is not a valid {kind}"));
    Ok(match kind {
        k if k.is_integer() => match raw.parse::<i64>() {
            Ok(n) => Value::I64(n),
            Err(_) => Value::U64(raw.parse().map_err(|_| bad())?),
        },
        FieldKind::Bool => Value::Bool(raw.parse().map_err(|_| bad())?),
        FieldKind::Float => Value::F32(raw.parse().map_err(|_| bad())?),
        FieldKind::Double => Value::F64(raw.parse().map_err(|_| bad())?),
        FieldKind::String => Value::Str(raw.to_owned()),
        FieldKind::Bytes => Value::Bytes(raw.as_bytes().to_vec()),
        FieldKind::Message(_) | FieldKind::Map { .. } => {
            return Err(CliError::Usage(format!(
                "field `{field}` holds a {kind}; use --json to set it"
            )))
        }
        _ => return Err(bad()),
    })
}

fn parse_key(field: &str, kind: MapKeyKind, raw: &str) -> CliResult<MapKey> {
    let bad = || {
        CliError::Usage(format!(
            "field `{field}`: `{raw}` is not a valid {} key",
            kind.name()
        ))
    };
    Ok(match kind {
        MapKeyKind::String => MapKey::Str(raw.to_owned()),
        MapKeyKind::Bool => MapKey::Bool(raw.parse().map_err(|_| bad())?),
        MapKeyKind::UInt32 | MapKeyKind::UInt64 => MapKey::U64(raw.parse().map_err(|_| bad())?),
        _ => MapKey::I64(raw.parse().map_err(|_| bad())?),
    })
}
