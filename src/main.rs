//! parsesweep - Batch conformance harness for TypeScript/TSX parsing
//!
//! Loads every supported file under a root, parses each one in isolation,
//! and prints an outcome histogram followed by a shallow tree dump.

mod cli;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use parsesweep::parser::{fault, ParseContext, TreeSitterBackend};
use parsesweep::{Harness, HarnessConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
    fault::install_quiet_hook();

    let config = match HarnessConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {e:#}", "error".red().bold());
            return ExitCode::FAILURE;
        }
    };

    let ctx = ParseContext::new().with_timeout(config.parse_timeout());
    let handle = ctx.clone();
    if let Err(e) = ctrlc::set_handler(move || handle.cancel()) {
        tracing::warn!(error = %e, "failed to install Ctrl-C handler");
    }

    let harness = Harness::new(&config, TreeSitterBackend, ctx);
    let mut out = io::stdout().lock();
    match harness.run(&cli.root, &mut out) {
        Ok(summary) => {
            tracing::info!(files = summary.loaded, "run complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            ExitCode::FAILURE
        }
    }
}
