// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fault-isolated parse runner
//!
//! One call, one outcome. Parser panics are caught at the file boundary and
//! reported as `fault`, so a single pathological input cannot stop a batch.

use std::io::{self, Write};

use crate::dialect::DialectMap;
use crate::loader::SourceFile;
use crate::parser::fault;
use crate::parser::{DiscardEvents, Lexer, ParseContext, ParseError, Parser, StopOnFirstError, SyntaxBackend};

/// Classified result of one parse attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseOutcome {
    Success,
    ParseError,
    InternalFault,
    NoParserAvailable,
    Cancelled,
    /// The per-file deadline expired
    TimedOut,
}

impl ParseOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseOutcome::Success => "ok",
            ParseOutcome::ParseError => "parse_err",
            ParseOutcome::InternalFault => "fault",
            ParseOutcome::NoParserAvailable => "no_parser",
            ParseOutcome::Cancelled => "cancelled",
            ParseOutcome::TimedOut => "timed_out",
        }
    }
}

impl std::fmt::Display for ParseOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs one parse attempt per file against a backend
pub struct ParseRunner<'a, B: ?Sized> {
    backend: &'a B,
    dialects: &'a DialectMap,
}

impl<'a, B> ParseRunner<'a, B>
where
    B: SyntaxBackend + ?Sized,
{
    pub fn new(backend: &'a B, dialects: &'a DialectMap) -> Self {
        Self { backend, dialects }
    }

    /// Parse `file` and classify the result, writing one diagnostic line for
    /// anything other than success or a missing dialect.
    ///
    /// Only write failures on `out` are returned as errors.
    pub fn run(&self, ctx: &ParseContext, file: &SourceFile, out: &mut dyn Write) -> io::Result<ParseOutcome> {
        let Some(dialect) = self.dialects.dialect_for(file.ext()) else {
            tracing::debug!(path = %file.path.display(), ext = file.ext(), "no dialect for extension");
            return Ok(ParseOutcome::NoParserAvailable);
        };

        let attempt = fault::guard(|| {
            let lexer = Lexer::new(&file.content, dialect);
            let mut parser = Parser::new(StopOnFirstError, DiscardEvents);
            parser.parse(self.backend, ctx, &lexer)
        });

        let outcome = match attempt {
            Ok(Ok(())) => ParseOutcome::Success,
            Ok(Err(err)) if err.is_cancellation() => {
                writeln!(out, "{}: {}", file.path.display(), err)?;
                ParseOutcome::Cancelled
            }
            Ok(Err(err @ ParseError::TimedOut)) => {
                writeln!(out, "{}: {}", file.path.display(), err)?;
                ParseOutcome::TimedOut
            }
            Ok(Err(err)) => {
                writeln!(out, "{}: {}{}", file.path.display(), err, offending_suffix(&err, &file.content))?;
                ParseOutcome::ParseError
            }
            Err(fault) => {
                writeln!(out, "{}: recovered: {}", file.path.display(), fault)?;
                tracing::warn!(path = %file.path.display(), detail = %fault, "parser fault recovered");
                ParseOutcome::InternalFault
            }
        };

        tracing::debug!(path = %file.path.display(), %dialect, %outcome, "parsed");
        Ok(outcome)
    }
}

fn offending_suffix(err: &ParseError, source: &str) -> String {
    err.syntax()
        .and_then(|syntax| syntax.offending(source))
        .map(|text| format!(" on `{text}`"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::parser::{SyntaxError, TreeSitterBackend};
    use tree_sitter::Tree;

    struct AlwaysPanics;

    impl SyntaxBackend for AlwaysPanics {
        fn parse_tree(&self, _ctx: &ParseContext, _lexer: &Lexer<'_>) -> Result<Tree, ParseError> {
            let offsets: Vec<usize> = Vec::new();
            let offset = offsets[10];
            unreachable!("read offset {offset} from an empty table")
        }
    }

    struct SpanlessError;

    impl SyntaxBackend for SpanlessError {
        fn parse_tree(&self, _ctx: &ParseContext, _lexer: &Lexer<'_>) -> Result<Tree, ParseError> {
            Err(ParseError::Syntax(SyntaxError::new("unexpected token", 1, 1)))
        }
    }

    struct NeverFinishes;

    impl SyntaxBackend for NeverFinishes {
        fn parse_tree(&self, _ctx: &ParseContext, _lexer: &Lexer<'_>) -> Result<Tree, ParseError> {
            Err(ParseError::TimedOut)
        }
    }

    fn run_with<B: SyntaxBackend + ?Sized>(backend: &B, file: &SourceFile) -> (ParseOutcome, String) {
        let dialects = DialectMap::default();
        let mut out: Vec<u8> = Vec::new();
        let outcome = ParseRunner::new(backend, &dialects)
            .run(&ParseContext::new(), file, &mut out)
            .unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(ParseOutcome::Success.to_string(), "ok");
        assert_eq!(ParseOutcome::ParseError.to_string(), "parse_err");
        assert_eq!(ParseOutcome::InternalFault.to_string(), "fault");
        assert_eq!(ParseOutcome::NoParserAvailable.to_string(), "no_parser");
        assert_eq!(ParseOutcome::Cancelled.to_string(), "cancelled");
        assert_eq!(ParseOutcome::TimedOut.to_string(), "timed_out");
    }

    #[test]
    fn test_success_is_silent() {
        let file = SourceFile::new("a.ts", "export const a: number = 1;\n");
        let (outcome, out) = run_with(&TreeSitterBackend, &file);
        assert_eq!(outcome, ParseOutcome::Success);
        assert!(out.is_empty());
    }

    #[test]
    fn test_parse_error_diagnostic() {
        let file = SourceFile::new("b.tsx", "function {{{ ))) ;\n");
        let (outcome, out) = run_with(&TreeSitterBackend, &file);
        assert_eq!(outcome, ParseOutcome::ParseError);
        assert!(out.starts_with("b.tsx: "), "{out}");
        assert!(out.contains(" on `"), "{out}");
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_missing_token_has_no_empty_suffix() {
        let file = SourceFile::new("p.ts", "function f() {");
        let (outcome, out) = run_with(&TreeSitterBackend, &file);
        assert_eq!(outcome, ParseOutcome::ParseError);
        assert!(out.starts_with("p.ts: missing `}`"), "{out}");
        assert!(!out.contains(" on `"), "{out}");
    }

    #[test]
    fn test_deadline_is_its_own_outcome() {
        let file = SourceFile::new("slow.ts", "let x = 1;");
        let (outcome, out) = run_with(&NeverFinishes, &file);
        assert_eq!(outcome, ParseOutcome::TimedOut);
        assert_eq!(out, "slow.ts: parse timed out\n");
    }

    #[test]
    fn test_real_deadline_with_tree_sitter() {
        let source = "let value: number = 1 + 2 * 3;\n".repeat(200_000);
        let file = SourceFile::new("big.ts", source);
        let dialects = DialectMap::default();
        let ctx = ParseContext::new().with_timeout(Some(std::time::Duration::from_millis(1)));
        let mut out: Vec<u8> = Vec::new();
        let outcome = ParseRunner::new(&TreeSitterBackend, &dialects)
            .run(&ctx, &file, &mut out)
            .unwrap();
        assert_eq!(outcome, ParseOutcome::TimedOut);
        assert!(!ctx.is_cancelled());
        assert_eq!(String::from_utf8(out).unwrap(), "big.ts: parse timed out\n");
    }

    #[test]
    fn test_parse_error_without_offsets_has_no_suffix() {
        let file = SourceFile::new("c.ts", "anything");
        let (outcome, out) = run_with(&SpanlessError, &file);
        assert_eq!(outcome, ParseOutcome::ParseError);
        assert_eq!(out, "c.ts: unexpected token at 1:1\n");
    }

    #[test]
    fn test_no_dialect_skips_parser() {
        let file = SourceFile::new("d.mts", "let x = 1;");
        let (outcome, out) = run_with(&AlwaysPanics, &file);
        assert_eq!(outcome, ParseOutcome::NoParserAvailable);
        assert!(out.is_empty());
    }

    #[test]
    fn test_panic_becomes_internal_fault() {
        let file = SourceFile::new("e.ts", "let x = 1;");
        let (outcome, out) = run_with(&AlwaysPanics, &file);
        assert_eq!(outcome, ParseOutcome::InternalFault);
        assert!(out.starts_with("e.ts: recovered: index out of bounds"), "{out}");
    }

    #[test]
    fn test_cancelled_outcome() {
        let dialects = DialectMap::default();
        let ctx = ParseContext::new();
        ctx.cancel();
        let mut out: Vec<u8> = Vec::new();
        let outcome = ParseRunner::new(&TreeSitterBackend, &dialects)
            .run(&ctx, &SourceFile::new("f.ts", "let x = 1;"), &mut out)
            .unwrap();
        assert_eq!(outcome, ParseOutcome::Cancelled);
        assert_eq!(String::from_utf8(out).unwrap(), "f.ts: parse cancelled\n");
    }

    #[test]
    fn test_custom_dialect_mapping() {
        let dialects = DialectMap::from_pairs([("mts", Dialect::Typescript)]);
        let mut out: Vec<u8> = Vec::new();
        let outcome = ParseRunner::new(&TreeSitterBackend, &dialects)
            .run(&ParseContext::new(), &SourceFile::new("g.mts", "let x = 1;\n"), &mut out)
            .unwrap();
        assert_eq!(outcome, ParseOutcome::Success);
    }
}
