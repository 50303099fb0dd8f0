//! Error types for a harness run
//!
//! Only run-level failures live here. Per-file problems (bad encoding, syntax
//! errors, parser faults) are recovered where they happen and never surface
//! as a `HarnessError`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseError;

/// A failure that stops the whole run
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Directory traversal failed (unreadable directory, vanished entry, ...)
    #[error("walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// A supported file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to the output stream failed
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    /// The tree inspection pass could not parse a file
    #[error("{}: {source}", path.display())]
    Inspect {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// The parser panicked during the tree inspection pass
    #[error("{}: parser fault during inspection: {detail}", path.display())]
    InspectFault { path: PathBuf, detail: String },

    /// The run was cancelled before it could finish
    #[error("run cancelled")]
    Cancelled,
}

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;
