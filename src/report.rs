// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outcome aggregation and the sorted histogram report

use std::collections::HashMap;
use std::io::{self, Write};

use crate::runner::ParseOutcome;

/// Aggregation key: outcome plus file extension
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutcomeKey {
    pub outcome: ParseOutcome,
    pub ext: String,
}

impl std::fmt::Display for OutcomeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.outcome, self.ext)
    }
}

/// Counts per outcome key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregator {
    counts: HashMap<OutcomeKey, usize>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: ParseOutcome, ext: &str) {
        let key = OutcomeKey {
            outcome,
            ext: ext.to_string(),
        };
        *self.counts.entry(key).or_insert(0) += 1;
    }

    pub fn count(&self, outcome: ParseOutcome, ext: &str) -> usize {
        let key = OutcomeKey {
            outcome,
            ext: ext.to_string(),
        };
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Sum over every key
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Rows sorted by key string
    pub fn rows(&self) -> Vec<(String, usize)> {
        let mut rows: Vec<(String, usize)> = self
            .counts
            .iter()
            .map(|(key, count)| (key.to_string(), *count))
            .collect();
        rows.sort();
        rows
    }

    /// Blank line, then one `{count:>10} {key}` row per key.
    pub fn write_report(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out)?;
        for (key, count) in self.rows() {
            writeln!(out, "{:>10} {}", count, key)?;
        }
        Ok(())
    }
}
