use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No spec or source RPM located for '{reference}'")]
    ArtifactNotFound { reference: String },

    #[error("Failed to parse spec file {path}: {reason}")]
    SpecParse { path: PathBuf, reason: String },

    #[error("build failed: {0}")]
    BuildFailure(String),

    #[error("Check '{check}' needs unknown or deprecated check '{missing}'")]
    UnresolvedDependency { check: String, missing: String },

    #[error("Cyclic check dependency: {cycle}")]
    CyclicDependency { cycle: String },

    #[error("Report renderer error: {0}")]
    Renderer(String),

    #[error("Failed to download {url}")]
    Download {
        url: String,
        #[source]
        source: Box<reqwest::Error>,
    },

    #[error("Invalid pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid regex: {pattern}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Registry file {path} rejected: {reason}")]
    InvalidRegistry { path: PathBuf, reason: String },
}

impl ReviewError {
    /// Process exit code for a fatal error. Configuration problems exit
    /// with 2, everything else with 1.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => crate::EXIT_CONFIG_ERROR,
            _ => crate::EXIT_FATAL,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReviewError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
