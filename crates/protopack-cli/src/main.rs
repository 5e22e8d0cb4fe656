use clap::Parser;
use protopack_cli::cli::Cli;
use protopack_cli::error::exit_with_error;

fn init_tracing(cli: &Cli) {
    // --quiet silences everything, --verbose defaults to debug for our crates
    // unless RUST_LOG says otherwise, and the default is warnings only.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "protopack=debug,protopack_cli=debug".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = protopack_cli::run(cli) {
        exit_with_error(e);
    }
}
