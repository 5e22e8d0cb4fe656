//! protopack command-line client.
//!
//! The `protopack` binary parses a [`cli::Cli`] and hands it to [`run`].
//! Command handlers live in [`commands`] and can be driven directly, which
//! is how the loopback tests exercise `serve` and `recv`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

use cli::{Cli, Commands};

/// Dispatch a parsed [`Cli`] to its command handler.
pub fn run(cli: Cli) -> error::CliResult<()> {
    let codec = config::load_codec(cli.schema.as_deref())?;
    let format = cli.format;

    match cli.command {
        Commands::Dump { message } => commands::dump::run(&codec, &message, format),

        Commands::Serve {
            listen,
            message,
            frame,
        } => commands::serve::run(&codec, &listen, &message, frame),

        Commands::Recv {
            connect,
            type_name,
            frame,
        } => commands::recv::run(&codec, &connect, &type_name, frame, format),

        Commands::Schema => commands::schema::run(&codec),
    }
}
