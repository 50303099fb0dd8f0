// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dialect selection - maps file extensions to grammar variants

use serde::Deserialize;
use std::collections::BTreeMap;

/// Grammar variant handed to the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Plain TypeScript
    Typescript,
    /// TypeScript with embedded JSX markup
    Tsx,
}

impl Dialect {
    /// The tree-sitter grammar for this dialect
    pub fn language(self) -> tree_sitter::Language {
        match self {
            Dialect::Typescript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Typescript => write!(f, "typescript"),
            Dialect::Tsx => write!(f, "tsx"),
        }
    }
}

/// Extension to dialect mapping
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct DialectMap(BTreeMap<String, Dialect>);

impl Default for DialectMap {
    fn default() -> Self {
        Self::from_pairs([("ts", Dialect::Typescript), ("tsx", Dialect::Tsx)])
    }
}

impl DialectMap {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, Dialect)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(ext, dialect)| (ext.to_string(), dialect))
                .collect(),
        )
    }

    /// Dialect for an extension (no leading dot, case-sensitive).
    pub fn dialect_for(&self, ext: &str) -> Option<Dialect> {
        self.0.get(ext).copied()
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
