use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default address for `serve` and `recv`.
pub const DEFAULT_ADDRESS: &str = "localhost:6000";

#[derive(Debug, Parser)]
#[command(
    name = "protopack",
    about = "Encode, inspect and send protocol-buffer messages",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all log output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// JSON schema descriptor; the built-in samples are used when omitted
    #[arg(long, global = true, env = "PROTOPACK_SCHEMA")]
    pub schema: Option<PathBuf>,

    /// How messages are printed
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Protobuf text format plus a byte-string literal
    Text,
    /// One JSON object per message
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print messages with their text form and serialized bytes.
    ///
    /// Without --set or --json, prints every sample message.
    Dump {
        #[command(flatten)]
        message: MessageArgs,
    },

    /// Accept one connection and send it one serialized message
    Serve {
        /// Address to listen on
        #[arg(long, default_value = DEFAULT_ADDRESS, env = "PROTOPACK_LISTEN")]
        listen: String,

        #[command(flatten)]
        message: MessageArgs,

        /// Prefix the payload with its length as a 4-byte big-endian integer
        #[arg(long)]
        frame: bool,
    },

    /// Connect, read one message until EOF and print it
    Recv {
        /// Address to connect to
        #[arg(long, default_value = DEFAULT_ADDRESS, env = "PROTOPACK_CONNECT")]
        connect: String,

        /// Message type expected from the peer
        #[arg(long = "type", default_value = "Foo")]
        type_name: String,

        /// Expect a 4-byte big-endian length prefix
        #[arg(long)]
        frame: bool,
    },

    /// Print the loaded schema registry as a JSON descriptor
    Schema,
}

/// How a command builds the message it works on.
#[derive(Debug, Clone, Default, Args)]
pub struct MessageArgs {
    /// Message type
    #[arg(long = "type")]
    pub type_name: Option<String>,

    /// Field assignment `name=value`; map fields take `name=key:value`
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// The whole message as a JSON object keyed by field name
    #[arg(long, conflicts_with = "set")]
    pub json: Option<String>,
}

impl MessageArgs {
    /// Whether the caller described a message at all.
    pub fn is_empty(&self) -> bool {
        self.type_name.is_none() && self.set.is_empty() && self.json.is_none()
    }
}
