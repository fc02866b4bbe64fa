//! Configuration file for bugbear.
//!
//! ```yaml
//! max_line_length: 88
//! select: [B, B9]
//! ignore: [B008]
//! excluded_paths:
//!   - "**/migrations/**"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File names looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["bugbear.yaml", ".bugbear.yaml"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid excluded_paths pattern {pattern:?}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("max_line_length must be positive")]
    ZeroLineLength,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub max_line_length: Option<usize>,
    /// Code prefixes to select. Absent means the default selection.
    #[serde(default)]
    pub select: Option<Vec<String>>,
    /// Code prefixes to drop from the output.
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Glob patterns for paths to skip while walking directories.
    #[serde(default)]
    pub excluded_paths: Vec<String>,
}

impl Config {
    /// Parse and validate a configuration file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_line_length == Some(0) {
            return Err(ConfigError::ZeroLineLength);
        }
        for pattern in &self.excluded_paths {
            globset::Glob::new(pattern).map_err(|source| ConfigError::Glob {
                pattern: pattern.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Check if a path should be excluded based on excluded_paths patterns.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();

        self.excluded_paths.iter().any(|pattern| {
            globset::Glob::new(pattern)
                .map(|glob| glob.compile_matcher().is_match(&*path_str))
                .unwrap_or(false)
        })
    }
}

/// Find a configuration file in `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
