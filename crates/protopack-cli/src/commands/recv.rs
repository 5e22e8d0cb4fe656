use std::io::{self, Read};
use std::net::TcpStream;

use protopack::ProtoCodec;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::error::CliResult;
use crate::output;

pub fn run(
    codec: &ProtoCodec,
    connect: &str,
    type_name: &str,
    frame: bool,
    format: OutputFormat,
) -> CliResult<()> {
    let bytes = receive(connect, frame)?;
    let message = codec.decode(type_name, &bytes)?;
    output::print_message(codec, &message, &bytes, format)
}

/// Connects to `address` and reads one message: up to EOF, or exactly the
/// announced length when `frame` is set.
pub fn receive(address: &str, frame: bool) -> io::Result<Vec<u8>> {
    let mut stream = TcpStream::connect(address)?;
    let mut bytes = Vec::new();
    if frame {
        let mut header = [0u8; 4];
        stream.read_exact(&mut header)?;
        // The announced length is untrusted; read no more than the peer sends.
        let len = u32::from_be_bytes(header) as usize;
        (&mut stream).take(len as u64).read_to_end(&mut bytes)?;
        if bytes.len() != len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("peer announced {len} byte(s) but sent {}", bytes.len()),
            ));
        }
    } else {
        stream.read_to_end(&mut bytes)?;
    }
    debug!(address, bytes = bytes.len(), "received message");
    Ok(bytes)
}
