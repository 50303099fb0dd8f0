// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for parsesweep
//!
//! Loads configuration from .parsesweep.toml in current directory or
//! ~/.config/parsesweep/config.toml. Every field is optional; missing fields
//! keep their defaults, except `extensions`, which follows `dialects` when
//! left out.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dialect::DialectMap;

const CONFIG_FILE_NAME: &str = ".parsesweep.toml";

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct HarnessConfig {
    /// Extensions the loader picks up (no leading dot, case-sensitive)
    pub extensions: BTreeSet<String>,
    /// Dialect for each extension; extensions without one report `no_parser`
    pub dialects: DialectMap,
    /// Directory names whose subtrees are never visited
    pub prune_dirs: BTreeSet<String>,
    /// Run a second, silent parse pass and compare it with the first
    pub repeat_pass: bool,
    /// Per-file parse deadline in milliseconds
    pub parse_timeout_ms: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        ConfigFile::default().into()
    }
}

/// On-disk shape; absent keys stay `None`
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    extensions: Option<BTreeSet<String>>,
    dialects: Option<DialectMap>,
    prune_dirs: Option<BTreeSet<String>>,
    repeat_pass: bool,
    parse_timeout_ms: Option<u64>,
}

impl From<ConfigFile> for HarnessConfig {
    fn from(file: ConfigFile) -> Self {
        let dialects = file.dialects.unwrap_or_default();
        let extensions = file
            .extensions
            .unwrap_or_else(|| dialects.extensions().map(str::to_string).collect());
        Self {
            extensions,
            dialects,
            prune_dirs: file
                .prune_dirs
                .unwrap_or_else(|| BTreeSet::from([".git".to_string()])),
            repeat_pass: file.repeat_pass,
            parse_timeout_ms: file.parse_timeout_ms,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from files
    ///
    /// Precedence (highest to lowest):
    /// 1. .parsesweep.toml in current directory
    /// 2. ~/.config/parsesweep/config.toml
    pub fn load() -> Result<Self> {
        if let Some(config) = Self::load_from_path(Path::new(CONFIG_FILE_NAME))? {
            return Ok(config);
        }

        if let Some(path) = Self::user_config_path() {
            if let Some(config) = Self::load_from_path(&path)? {
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("parsesweep").join("config.toml"))
    }

    /// Load a config file; `Ok(None)` when the file does not exist.
    pub fn load_from_path(path: &Path) -> Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()))
            }
        };
        let config = Self::from_toml(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(Some(config))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn is_supported(&self, ext: &str) -> bool {
        self.extensions.contains(ext)
    }

    pub fn parse_timeout(&self) -> Option<Duration> {
        self.parse_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;

    #[test]
    fn test_defaults_cover_ts_and_tsx() {
        let config = HarnessConfig::default();
        assert!(config.is_supported("ts"));
        assert!(config.is_supported("tsx"));
        assert!(!config.is_supported("js"));
        assert!(config.prune_dirs.contains(".git"));
        assert!(!config.repeat_pass);
        assert_eq!(config.parse_timeout(), None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = HarnessConfig::from_toml("repeat_pass = true\n").unwrap();
        assert!(config.repeat_pass);
        assert_eq!(config.dialects, DialectMap::default());
        assert!(config.prune_dirs.contains(".git"));
    }

    #[test]
    fn test_custom_extensions_and_dialects() {
        let config = HarnessConfig::from_toml(
            r#"
extensions = ["mts", "js"]
prune_dirs = [".git", "node_modules"]
parse_timeout_ms = 250

[dialects]
mts = "typescript"
"#,
        )
        .unwrap();
        assert!(config.is_supported("mts"));
        assert!(config.is_supported("js"));
        assert!(!config.is_supported("ts"));
        assert_eq!(config.dialects.dialect_for("mts"), Some(Dialect::Typescript));
        assert_eq!(config.dialects.dialect_for("js"), None);
        assert!(config.prune_dirs.contains("node_modules"));
        assert_eq!(config.parse_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_extensions_follow_dialects_when_absent() {
        let config = HarnessConfig::from_toml("[dialects]\nmts = \"typescript\"\n").unwrap();
        assert!(config.is_supported("mts"));
        assert!(!config.is_supported("ts"));
        assert_eq!(config.dialects.dialect_for("mts"), Some(Dialect::Typescript));
        assert!(config.prune_dirs.contains(".git"));
    }

    #[test]
    fn test_explicit_extensions_win_over_dialects() {
        let config = HarnessConfig::from_toml("extensions = [\"ts\"]\n").unwrap();
        assert!(config.is_supported("ts"));
        assert!(!config.is_supported("tsx"));
        assert_eq!(config.dialects, DialectMap::default());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(HarnessConfig::from_toml("extension = [\"ts\"]\n").is_err());
    }

    #[test]
    fn test_unknown_dialect_is_rejected() {
        assert!(HarnessConfig::from_toml("[dialects]\nts = \"flow\"\n").is_err());
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = HarnessConfig::load_from_path(&dir.path().join("absent.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "prune_dirs = [\".hg\"]\n").unwrap();
        let loaded = HarnessConfig::load_from_path(&path).unwrap().unwrap();
        assert!(loaded.prune_dirs.contains(".hg"));
        assert!(!loaded.prune_dirs.contains(".git"));
    }
}
