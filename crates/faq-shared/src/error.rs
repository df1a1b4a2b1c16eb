//! Error types for rule loading and compilation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Invalid {category} pattern '{pattern}': {source}")]
    InvalidPattern {
        category: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to read rules file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse rules: {0}")]
    Parse(#[from] toml::de::Error),
}

impl RuleError {
    /// Rule category the error belongs to, if any
    pub fn category(&self) -> Option<&'static str> {
        match self {
            RuleError::InvalidPattern { category, .. } => Some(category),
            RuleError::Io { .. } | RuleError::Parse(_) => None,
        }
    }
}
