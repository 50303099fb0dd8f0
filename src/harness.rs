// SPDX-License-Identifier: MIT OR Apache-2.0

//! Harness pipeline: load, parse pass, report, tree inspection

use std::io::{self, Write};
use std::path::Path;

use crate::config::HarnessConfig;
use crate::errors::{HarnessError, Result};
use crate::inspect::inspect_file;
use crate::loader::{Loader, SourceFile};
use crate::parser::{ParseContext, SyntaxBackend};
use crate::report::Aggregator;
use crate::runner::ParseRunner;

/// What a completed run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub loaded: usize,
    pub table: Aggregator,
}

/// A configured harness over one backend
pub struct Harness<'a, B> {
    config: &'a HarnessConfig,
    backend: B,
    ctx: ParseContext,
}

impl<'a, B: SyntaxBackend> Harness<'a, B> {
    pub fn new(config: &'a HarnessConfig, backend: B, ctx: ParseContext) -> Self {
        Self { config, backend, ctx }
    }

    /// Run the whole pipeline over `root`, writing the stdout protocol to `out`.
    pub fn run(&self, root: &Path, out: &mut dyn Write) -> Result<RunSummary> {
        let files = Loader::new(self.config).load(root, out)?;
        writeln!(out, "loaded {} files", files.len())?;
        tracing::info!(root = %root.display(), files = files.len(), "discovery complete");

        let table = self.parse_pass(&files, out)?;
        table.write_report(out)?;

        if self.config.repeat_pass {
            self.verify_repeat(&files, &table)?;
        }

        if self.ctx.is_cancelled() {
            out.flush()?;
            return Err(HarnessError::Cancelled);
        }

        self.inspect_pass(&files, out)?;
        out.flush()?;

        Ok(RunSummary {
            loaded: files.len(),
            table,
        })
    }

    /// One parse attempt per file, counted by outcome and extension.
    pub fn parse_pass(&self, files: &[SourceFile], out: &mut dyn Write) -> Result<Aggregator> {
        let runner = ParseRunner::new(&self.backend, &self.config.dialects);
        let mut table = Aggregator::new();

        for file in files {
            let outcome = runner.run(&self.ctx, file, out)?;
            table.record(outcome, file.ext());
        }

        debug_assert_eq!(table.total(), files.len());
        Ok(table)
    }

    /// Silent second pass; the parser must classify every file the same way.
    fn verify_repeat(&self, files: &[SourceFile], first: &Aggregator) -> Result<()> {
        let second = self.parse_pass(files, &mut io::sink())?;
        if &second == first {
            tracing::info!(files = files.len(), "repeat pass matched");
        } else {
            tracing::warn!(
                first = ?first.rows(),
                second = ?second.rows(),
                "repeat pass produced different outcomes"
            );
        }
        Ok(())
    }

    pub fn inspect_pass(&self, files: &[SourceFile], out: &mut dyn Write) -> Result<()> {
        for file in files {
            inspect_file(&self.backend, &self.ctx, &self.config.dialects, file, out)?;
        }
        Ok(())
    }
}
