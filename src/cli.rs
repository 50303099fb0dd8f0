// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap

use clap::Parser;
use std::path::PathBuf;

/// parsesweep - Parse every TypeScript/TSX file under a directory
///
/// Prints one diagnostic per failing file, an outcome histogram, and the
/// top-level shape of each parsed tree. Configuration is read from
/// .parsesweep.toml or ~/.config/parsesweep/config.toml; log verbosity
/// follows RUST_LOG.
#[derive(Parser, Debug)]
#[command(name = "parsesweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory to scan
    pub root: PathBuf,
}
