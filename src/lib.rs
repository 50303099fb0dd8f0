//! parsesweep - Batch conformance harness for TypeScript/TSX parsing
//!
//! Walks a directory, parses every supported file with tree-sitter under the
//! dialect its extension selects, and reports an outcome histogram. Parser
//! panics are contained per file.

pub mod config;
pub mod dialect;
pub mod errors;
pub mod harness;
pub mod inspect;
pub mod loader;
pub mod parser;
pub mod report;
pub mod runner;

pub use config::HarnessConfig;
pub use errors::{HarnessError, Result};
pub use harness::{Harness, RunSummary};
pub use runner::ParseOutcome;
