//! # chatpulse CLI
//!
//! Command-line interface for the chatpulse library.

use std::fs;
use std::process;

use clap::Parser as ClapParser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chatpulse::ChatpulseError;
use chatpulse::cli::{self, Args};

/// Environment variable holding the log filter (e.g. `chatpulse=debug`).
const LOG_ENV: &str = "CHATPULSE_LOG";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), ChatpulseError> {
    let args = <Args as ClapParser>::parse();

    let value = cli::run(&args)?;
    let rendered = args.format.render(&value)?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered + "\n")?;
            info!(path = %path.display(), "result written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
