// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grammar backends

use tree_sitter::Tree;

use super::{Lexer, ParseContext, ParseError};

/// Produces a concrete syntax tree for a lexer's source
///
/// This is the seam between the harness and the parser library. Any
/// implementation may fail in ways it does not report as a `ParseError`
/// (panics included); callers that need isolation wrap calls in
/// [`fault::guard`](super::fault::guard).
pub trait SyntaxBackend {
    fn parse_tree(&self, ctx: &ParseContext, lexer: &Lexer<'_>) -> Result<Tree, ParseError>;
}

/// tree-sitter with the TypeScript grammars
///
/// A fresh `tree_sitter::Parser` is created per call so no state leaks
/// between files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterBackend;

impl SyntaxBackend for TreeSitterBackend {
    fn parse_tree(&self, ctx: &ParseContext, lexer: &Lexer<'_>) -> Result<Tree, ParseError> {
        if ctx.is_cancelled() {
            return Err(ParseError::Cancelled);
        }

        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&lexer.dialect().language())?;
        if let Some(timeout) = ctx.timeout() {
            parser.set_timeout_micros(u64::try_from(timeout.as_micros()).unwrap_or(u64::MAX));
        }

        // SAFETY: the flag is owned by `ctx`, which outlives `parser`, and it
        // is detached again before `parser` is dropped.
        unsafe { parser.set_cancellation_flag(Some(ctx.cancel_flag())) };
        let tree = parser.parse(lexer.source(), None);
        unsafe { parser.set_cancellation_flag(None) };

        match tree {
            Some(tree) => Ok(tree),
            None if ctx.is_cancelled() => Err(ParseError::Cancelled),
            None if ctx.timeout().is_some() => Err(ParseError::TimedOut),
            None => Err(ParseError::NoTree),
        }
    }
}
