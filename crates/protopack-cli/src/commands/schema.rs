use protopack::ProtoCodec;

use crate::error::CliResult;

/// Prints the registry as a JSON descriptor document, loadable with `--schema`.
pub fn run(codec: &ProtoCodec) -> CliResult<()> {
    println!("{}", codec.registry().to_document().to_json_string_pretty()?);
    Ok(())
}
