//! One-shot listener: accept a single connection, send one message, close.

use std::io::{self, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};

use protopack::ProtoCodec;
use protopack_buffers::print_octets_default;
use tracing::{debug, info};

use crate::cli::MessageArgs;
use crate::config;
use crate::error::CliResult;

pub fn run(codec: &ProtoCodec, listen: &str, args: &MessageArgs, frame: bool) -> CliResult<()> {
    let message = if args.is_empty() {
        config::build_message(codec, &default_args(), "Foo")?
    } else {
        config::build_message(codec, args, "Foo")?
    };
    let payload = codec.encode(&message)?;

    let listener = TcpListener::bind(listen)?;
    println!("server is listening {listen}");
    info!(address = %listener.local_addr()?, "listening");

    let (stream, peer) = accept(&listener)?;
    println!("connection accepted from {peer}");
    send(stream, &payload, frame)?;
    Ok(())
}

/// `Foo { a: 1, b: -1 }`, sent when no message is described.
fn default_args() -> MessageArgs {
    MessageArgs {
        type_name: Some("Foo".to_owned()),
        set: vec!["a=1".to_owned(), "b=-1".to_owned()],
        json: None,
    }
}

/// Blocks until one peer connects.
pub fn accept(listener: &TcpListener) -> io::Result<(TcpStream, SocketAddr)> {
    let (stream, peer) = listener.accept()?;
    info!(%peer, "connection accepted");
    Ok((stream, peer))
}

/// Writes `payload`, length-prefixed when `frame` is set, then closes the
/// connection.
pub fn send(mut stream: TcpStream, payload: &[u8], frame: bool) -> io::Result<()> {
    if frame {
        let len = u32::try_from(payload.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "payload exceeds 4 GiB"))?;
        stream.write_all(&len.to_be_bytes())?;
    }
    stream.write_all(payload)?;
    stream.flush()?;
    debug!(bytes = payload.len(), octets = %print_octets_default(payload), "sent message");
    Ok(())
}

/// [`accept`] then [`send`]. Returns the peer address.
pub fn serve_once(listener: &TcpListener, payload: &[u8], frame: bool) -> io::Result<SocketAddr> {
    let (stream, peer) = accept(listener)?;
    send(stream, payload, frame)?;
    Ok(peer)
}
