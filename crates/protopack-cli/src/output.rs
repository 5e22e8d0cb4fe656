//! Printing messages to stdout.

use protopack::{MessageValue, ProtoCodec};
use protopack_buffers::{print_byte_literal, print_octets};
use serde_json::json;

use crate::cli::OutputFormat;
use crate::error::CliResult;

/// Renders one message with its serialized bytes.
///
/// Text output is the type name, the text-format body and the bytes as a
/// byte-string literal, each followed by a blank line. JSON output is one
/// compact object per line.
pub fn render_message(
    codec: &ProtoCodec,
    message: &MessageValue,
    bytes: &[u8],
    format: OutputFormat,
) -> CliResult<String> {
    Ok(match format {
        OutputFormat::Text => format!(
            "{}\n{}\n{}\n",
            message.type_name(),
            codec.to_text(message)?,
            print_byte_literal(bytes)
        ),
        OutputFormat::Json => {
            let record = json!({
                "type": message.type_name(),
                "message": codec.to_json(message)?,
                "bytes": print_octets(bytes, usize::MAX),
            });
            format!("{}\n", serde_json::to_string(&record)?)
        }
    })
}

pub fn print_message(
    codec: &ProtoCodec,
    message: &MessageValue,
    bytes: &[u8],
    format: OutputFormat,
) -> CliResult<()> {
    print!("{}", render_message(codec, message, bytes, format)?);
    Ok(())
}
