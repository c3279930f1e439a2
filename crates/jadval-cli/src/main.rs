mod cli;
mod config;
mod extract_cmd;
mod preview_cmd;
mod shared;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        cli::Commands::Extract(ref args) => extract_cmd::run(args),
        cli::Commands::Preview {
            ref file,
            ref pages,
            ref text,
            strategy,
            ref config,
        } => preview_cmd::run(file, pages.as_deref(), text, strategy, config.as_deref()),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}

/// Log to stderr. `RUST_LOG` takes precedence over `-v`/`-q`.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
