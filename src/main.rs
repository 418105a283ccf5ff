use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use taskdash::cli::Cli;
use taskdash::output::{emit_error, infer_command_name_from_args};

fn main() {
    init_tracing();

    // clap would exit before we know the subcommand, so sniff it from the
    // raw args for the error envelope.
    let command = infer_command_name_from_args();

    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = cli.run() {
        let _ = emit_error(&command, &err, json);
        std::process::exit(err.exit_code());
    }
}

/// Tracing is opt-in via RUST_LOG; malformed or oversized values are
/// ignored rather than fatal.
fn init_tracing() {
    const MAX_FILTER_LEN: usize = 4096;

    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > MAX_FILTER_LEN {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
