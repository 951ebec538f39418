use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::error::{ReviewError, Result};

const LOCAL_CONFIG_NAME: &str = ".pkg-review.toml";
const USER_CONFIG_NAME: &str = "config.toml";

fn default_bug_url_template() -> String {
    "https://bugzilla.redhat.com/show_bug.cgi?id={id}".to_string()
}

/// User configuration. Every field has a default so a missing config
/// file is equivalent to an empty one.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Group toggles: `true` forces a group on, `false` off. Groups not
    /// listed fall back to their own applicability predicate.
    #[serde(default)]
    pub groups: BTreeMap<String, bool>,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub checks: ChecksConfig,

    #[serde(default)]
    pub report: ReportConfig,

    /// `{id}` is replaced by the ticket number.
    #[serde(default = "default_bug_url_template")]
    pub bug_url_template: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
            build: BuildConfig::default(),
            checks: ChecksConfig::default(),
            report: ReportConfig::default(),
            bug_url_template: default_bug_url_template(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct BuildConfig {
    /// Default mock configuration name; overridden by `--mock-config`.
    #[serde(default)]
    pub mock_config: Option<String>,

    /// Extra options passed through to mock.
    #[serde(default)]
    pub mock_options: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ChecksConfig {
    /// Directories searched for declarative registries, prepended to
    /// `REVIEW_EXT_DIRS`.
    #[serde(default)]
    pub ext_dirs: Vec<PathBuf>,

    /// Directories searched for script checks, prepended to
    /// `REVIEW_SCRIPT_DIRS`.
    #[serde(default)]
    pub script_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ReportConfig {
    /// Also write the XML report next to the plain-text one.
    #[serde(default)]
    pub xml: bool,
}

/// Filesystem seam for loader tests.
pub trait FileSystem {
    /// # Errors
    /// Returns an error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    fn exists(&self, path: &Path) -> bool;

    /// # Errors
    /// Returns an error if the current directory cannot be determined.
    fn current_dir(&self) -> std::io::Result<PathBuf>;

    /// Platform config directory (XDG on Linux).
    fn config_dir(&self) -> Option<PathBuf>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn current_dir(&self) -> std::io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn config_dir(&self) -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "pkg-review")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }
}

pub trait ConfigLoader {
    /// # Errors
    /// Returns `Config` when an existing file cannot be read or parsed.
    fn load(&self) -> Result<Config>;
}

/// Loads configuration from the filesystem.
///
/// Search order:
/// 1. `.pkg-review.toml` in the current directory
/// 2. `config.toml` in the platform config directory
/// 3. `Config::default()` when neither exists
pub struct FileConfigLoader<F: FileSystem = RealFileSystem> {
    fs: F,
}

impl FileConfigLoader<RealFileSystem> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fs: RealFileSystem,
        }
    }
}

impl Default for FileConfigLoader<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem> FileConfigLoader<F> {
    pub const fn with_filesystem(fs: F) -> Self {
        Self { fs }
    }

    fn parse(path: &Path, content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|e| {
            ReviewError::Config(format!("cannot parse {}: {e}", path.display()))
        })
    }
}

impl<F: FileSystem> ConfigLoader for FileConfigLoader<F> {
    fn load(&self) -> Result<Config> {
        let local = self.fs.current_dir()?.join(LOCAL_CONFIG_NAME);
        if self.fs.exists(&local) {
            debug!("loading config from {}", local.display());
            let content = self
                .fs
                .read_to_string(&local)
                .map_err(|e| ReviewError::Config(format!("cannot read {}: {e}", local.display())))?;
            return Self::parse(&local, &content);
        }

        if let Some(dir) = self.fs.config_dir() {
            let user = dir.join(USER_CONFIG_NAME);
            if self.fs.exists(&user) {
                debug!("loading config from {}", user.display());
                let content = self.fs.read_to_string(&user).map_err(|e| {
                    ReviewError::Config(format!("cannot read {}: {e}", user.display()))
                })?;
                return Self::parse(&user, &content);
            }
        }

        debug!("no config file found, using defaults");
        Ok(Config::default())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
