// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error policies and structural event sinks

use super::SyntaxError;

/// Decides whether parsing continues past a syntax error
pub trait ErrorPolicy {
    /// Return `true` to continue, `false` to stop with this error.
    fn on_error(&mut self, error: &SyntaxError) -> bool;
}

impl<F> ErrorPolicy for F
where
    F: FnMut(&SyntaxError) -> bool,
{
    fn on_error(&mut self, error: &SyntaxError) -> bool {
        self(error)
    }
}

/// Stop at the first syntax error
#[derive(Debug, Clone, Copy, Default)]
pub struct StopOnFirstError;

impl ErrorPolicy for StopOnFirstError {
    fn on_error(&mut self, _error: &SyntaxError) -> bool {
        false
    }
}

/// Continue past every error, keeping them
#[derive(Debug, Clone, Default)]
pub struct CollectErrors {
    pub errors: Vec<SyntaxError>,
}

impl ErrorPolicy for CollectErrors {
    fn on_error(&mut self, error: &SyntaxError) -> bool {
        self.errors.push(error.clone());
        true
    }
}

/// Receives one event per visited node: kind plus byte offsets
pub trait EventSink {
    fn node(&mut self, kind: &'static str, start: usize, end: usize);

    /// Sinks that return `false` let the parser skip error-free subtrees.
    fn wants_events(&self) -> bool {
        true
    }
}

impl<F> EventSink for F
where
    F: FnMut(&'static str, usize, usize),
{
    fn node(&mut self, kind: &'static str, start: usize, end: usize) {
        self(kind, start, end)
    }
}

/// Drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardEvents;

impl EventSink for DiscardEvents {
    fn node(&mut self, _kind: &'static str, _start: usize, _end: usize) {}

    fn wants_events(&self) -> bool {
        false
    }
}

/// Counts visited nodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeCounter {
    pub nodes: usize,
}

impl EventSink for NodeCounter {
    fn node(&mut self, _kind: &'static str, _start: usize, _end: usize) {
        self.nodes += 1;
    }
}
