// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parser module - the narrow contract the harness drives tree-sitter through
//!
//! A parse attempt is a `Lexer` (source + dialect) handed to a `Parser`
//! configured with an `ErrorPolicy` and an `EventSink`. The grammar work is
//! done by a `SyntaxBackend`; the parser walks the resulting tree, reports
//! syntax errors to the policy and node events to the sink.

pub mod backend;
pub mod fault;
pub mod policy;
pub mod tree;

use std::ops::Range;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tree_sitter::{Node, Tree};

use crate::dialect::Dialect;

pub use backend::{SyntaxBackend, TreeSitterBackend};
pub use policy::{CollectErrors, DiscardEvents, ErrorPolicy, EventSink, NodeCounter, StopOnFirstError};
pub use tree::{Any, Kind, Selector, SyntaxTree, TreeError, TreeNode};

/// Cancellation-aware execution context for parse calls
///
/// Clones share the cancellation flag, so a clone handed to a signal handler
/// cancels every parse running under the original.
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    cancel: Arc<AtomicUsize>,
    timeout: Option<Duration>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a per-parse deadline
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cancel(&self) {
        self.cancel.store(1, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst) != 0
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn cancel_flag(&self) -> &AtomicUsize {
        &self.cancel
    }
}

/// Source text plus the dialect to lex it with
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'s> {
    source: &'s str,
    dialect: Dialect,
}

impl<'s> Lexer<'s> {
    pub fn new(source: &'s str, dialect: Dialect) -> Self {
        Self { source, dialect }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
}

/// A structured syntax error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {line}:{column}")]
pub struct SyntaxError {
    pub message: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column, in bytes
    pub column: usize,
    /// Byte offsets of the offending text, when known
    pub span: Option<Range<usize>>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            span: None,
        }
    }

    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = Some(span);
        self
    }

    fn from_node(node: &Node<'_>) -> Self {
        let message = if node.is_missing() {
            format!("missing `{}`", node.kind())
        } else {
            "syntax error".to_string()
        };
        let position = node.start_position();
        Self::new(message, position.row + 1, position.column + 1).with_span(node.byte_range())
    }

    /// The source text between the error's offsets.
    ///
    /// `None` when there are no offsets, the span is empty (a missing
    /// token), or it does not fall inside `source` on character boundaries.
    pub fn offending<'s>(&self, source: &'s str) -> Option<&'s str> {
        self.span
            .clone()
            .filter(|span| !span.is_empty())
            .and_then(|span| source.get(span))
    }
}

/// Why a parse call did not succeed
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(SyntaxError),

    #[error("parse cancelled")]
    Cancelled,

    #[error("parse timed out")]
    TimedOut,

    #[error("grammar rejected by parser: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser produced no tree")]
    NoTree,
}

impl ParseError {
    pub fn syntax(&self) -> Option<&SyntaxError> {
        match self {
            ParseError::Syntax(err) => Some(err),
            _ => None,
        }
    }

    /// True when the shared cancellation flag stopped the parse.
    ///
    /// A per-file deadline is not a cancellation; see [`ParseError::TimedOut`].
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ParseError::Cancelled)
    }
}

/// Parser configured with an error policy and an event sink
pub struct Parser<P, S> {
    policy: P,
    sink: S,
}

impl<P: ErrorPolicy, S: EventSink> Parser<P, S> {
    pub fn new(policy: P, sink: S) -> Self {
        Self { policy, sink }
    }

    /// Parse the lexer's source, reporting errors to the policy.
    ///
    /// Returns the error the policy declined to continue past, or `Ok(())`
    /// when the source is clean or every error was accepted.
    pub fn parse<B>(&mut self, backend: &B, ctx: &ParseContext, lexer: &Lexer<'_>) -> Result<(), ParseError>
    where
        B: SyntaxBackend + ?Sized,
    {
        let tree = backend.parse_tree(ctx, lexer)?;
        self.visit(ctx, &tree)
    }

    /// Parse into a navigable tree.
    pub fn build_tree<'s, B>(
        &mut self,
        backend: &B,
        ctx: &ParseContext,
        path: &Path,
        lexer: &Lexer<'s>,
    ) -> Result<SyntaxTree<'s>, ParseError>
    where
        B: SyntaxBackend + ?Sized,
    {
        let tree = backend.parse_tree(ctx, lexer)?;
        self.visit(ctx, &tree)?;
        Ok(SyntaxTree::new(path, lexer.source(), tree))
    }

    pub fn into_parts(self) -> (P, S) {
        (self.policy, self.sink)
    }

    /// Pre-order walk; clean subtrees are skipped when the sink ignores events.
    fn visit(&mut self, ctx: &ParseContext, tree: &Tree) -> Result<(), ParseError> {
        let wants_events = self.sink.wants_events();
        let mut cursor = tree.walk();

        loop {
            if ctx.is_cancelled() {
                return Err(ParseError::Cancelled);
            }

            let node = cursor.node();
            self.sink.node(node.kind(), node.start_byte(), node.end_byte());

            if node.is_error() || node.is_missing() {
                let err = SyntaxError::from_node(&node);
                if !self.policy.on_error(&err) {
                    return Err(ParseError::Syntax(err));
                }
            }

            let descend = wants_events || node.has_error();
            if descend && cursor.goto_first_child() {
                continue;
            }

            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return Ok(());
                }
            }
        }
    }
}
