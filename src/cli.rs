use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};

use crate::error::{ReviewError, Result};
use crate::fetch::ArtifactSource;

/// Color output control
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal capability
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser, Debug)]
#[command(name = "pkg-review")]
#[command(author, version, about = "Automated distribution-package review")]
#[command(long_about = "Fetches a candidate source package, rebuilds it in an \
    isolated root and runs the guideline check battery over the result.\n\n\
    Exit codes:\n  \
    0 - Review completed (regardless of individual check outcomes)\n  \
    1 - Fatal error\n  \
    2 - Configuration error")]
#[command(group(ArgGroup::new("source").args(["bug", "url", "name"])))]
pub struct Cli {
    /// Ticket id; its page is scanned for spec and SRPM links
    #[arg(short, long, value_name = "ID")]
    pub bug: Option<String>,

    /// Direct URL of a source RPM
    #[arg(short, long)]
    pub url: Option<String>,

    /// Basename of a spec/SRPM pair in the current directory
    #[arg(short, long, value_name = "BASENAME")]
    pub name: Option<String>,

    /// Run a single check (prerequisites run but stay out of the report)
    #[arg(long, value_name = "CHECK")]
    pub single: Option<String>,

    /// Checks to skip (comma-separated)
    #[arg(short = 'x', long, value_name = "LIST", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Mock configuration to build with
    #[arg(long, value_name = "NAME")]
    pub mock_config: Option<String>,

    /// Extra options passed through to mock
    #[arg(long, value_name = "STRING", allow_hyphen_values = true)]
    pub mock_options: Option<String>,

    /// Reuse build results persisted by a previous run
    #[arg(long)]
    pub cache: bool,

    /// Never build; requires persisted results from a previous run
    #[arg(long)]
    pub no_build: bool,

    /// Refuse all network access
    #[arg(long)]
    pub offline: bool,

    /// List every known check and exit
    #[arg(long)]
    pub display: bool,

    /// Review prebuilt binary RPMs from this directory instead of building
    #[arg(long, value_name = "DIR")]
    pub prebuilt: Option<PathBuf>,

    /// Work directory (default: ./<package>-review under the current dir)
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Control color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorChoice,
}

impl Cli {
    /// The artifact source, or `None` in `--display` mode.
    ///
    /// # Errors
    /// `Config` when no source is given outside `--display` mode, or
    /// when conflicting build modes are combined.
    pub fn artifact_source(&self) -> Result<Option<ArtifactSource>> {
        self.validate_build_modes()?;
        let source = match (&self.bug, &self.url, &self.name) {
            (Some(id), None, None) => Some(ArtifactSource::Bug(id.clone())),
            (None, Some(url), None) => Some(ArtifactSource::Url(url.clone())),
            (None, None, Some(name)) => Some(ArtifactSource::Name(name.clone())),
            (None, None, None) if self.display => None,
            (None, None, None) => {
                return Err(ReviewError::Config(
                    "one of --bug, --url or --name is required".to_string(),
                ));
            }
            // clap's ArgGroup rejects combinations before we get here.
            _ => unreachable!("mutually exclusive sources"),
        };
        Ok(source)
    }

    fn validate_build_modes(&self) -> Result<()> {
        let modes = [self.cache, self.no_build, self.prebuilt.is_some()];
        if modes.iter().filter(|m| **m).count() > 1 {
            return Err(ReviewError::Config(
                "--cache, --no-build and --prebuilt are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }

    /// Mock options split the way a shell would split a flat string.
    #[must_use]
    pub fn mock_option_list(&self) -> Vec<String> {
        self.mock_options
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(ToString::to_string)
            .collect()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
