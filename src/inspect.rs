// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tree inspection pass
//!
//! Re-parses a file into a full tree and prints its top-level shape. Unlike
//! the batch pass this assumes clean input: a parse failure or parser panic
//! ends the run. A file that runs past its deadline is skipped with a notice,
//! and cancellation ends the run as [`HarnessError::Cancelled`].

use std::io::Write;

use crate::dialect::DialectMap;
use crate::errors::{HarnessError, Result};
use crate::loader::SourceFile;
use crate::parser::fault;
use crate::parser::{
    Any, Lexer, NodeCounter, ParseContext, ParseError, Parser, StopOnFirstError, SyntaxBackend, TreeError,
};

/// Printed in place of a descendant kind when a child has none
pub const NO_DESCENDANT: &str = "(none)";

/// Print the root kind, then each root child's kind and the kind of that
/// child's first descendant.
pub fn inspect_file<B>(
    backend: &B,
    ctx: &ParseContext,
    dialects: &DialectMap,
    file: &SourceFile,
    out: &mut dyn Write,
) -> Result<()>
where
    B: SyntaxBackend + ?Sized,
{
    let Some(dialect) = dialects.dialect_for(file.ext()) else {
        tracing::debug!(path = %file.path.display(), "no dialect, skipping inspection");
        return Ok(());
    };

    let built = fault::guard(|| {
        let lexer = Lexer::new(&file.content, dialect);
        let mut parser = Parser::new(StopOnFirstError, NodeCounter::default());
        let tree = parser.build_tree(backend, ctx, &file.path, &lexer)?;
        let (_, counter) = parser.into_parts();
        Ok::<_, ParseError>((tree, counter))
    })
    .map_err(|fault| HarnessError::InspectFault {
        path: file.path.clone(),
        detail: fault.detail,
    })?;

    let (tree, counter) = match built {
        Ok(built) => built,
        Err(ParseError::Cancelled) => return Err(HarnessError::Cancelled),
        Err(ParseError::TimedOut) => {
            writeln!(out, "skipping {}: parse timed out", file.path.display())?;
            tracing::warn!(path = %file.path.display(), "inspection skipped after deadline");
            return Ok(());
        }
        Err(source) => {
            return Err(HarnessError::Inspect {
                path: file.path.clone(),
                source,
            })
        }
    };
    tracing::debug!(path = %file.path.display(), nodes = counter.nodes, "tree built");

    let root = tree.root();
    writeln!(out, "{}", root.kind())?;
    for child in root.children(&Any) {
        writeln!(out, "{}", child.kind())?;
        match child.child(&Any) {
            Ok(descendant) => writeln!(out, "{}", descendant.kind())?,
            Err(err @ TreeError::MissingChild { .. }) => {
                tracing::debug!(path = %tree.path().display(), %err, "no descendant");
                writeln!(out, "{NO_DESCENDANT}")?;
            }
        }
    }

    Ok(())
}
