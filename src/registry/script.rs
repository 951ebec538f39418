use std::path::{Path, PathBuf};
use std::process::Command;

use crate::check::{Check, CheckDescriptor, CheckResult, Kind, Outcome};
use crate::context::AnalysisContext;
use crate::error::{ReviewError, Result};

/// A shell snippet wrapped behind the check contract.
///
/// The filename (minus extension) provides the name; a header comment
/// block supplies the remaining descriptor fields:
///
/// ```sh
/// # group: Generic
/// # kind: SHOULD
/// # text: Package installs a desktop file
/// # url: https://example.org/guidelines
/// # needs: CheckBuildRequires
/// ```
///
/// The snippet runs with `SPEC`, `SRPM`, `BUILDDIR` and `REVIEW_NAME` in
/// its environment. Exit codes map to outcomes: 0 pass, 1 fail,
/// 2 pending, 3 not applicable. Stdout becomes the message.
pub struct ScriptCheck {
    descriptor: CheckDescriptor,
    path: PathBuf,
}

impl ScriptCheck {
    /// Parse the header block of a snippet.
    ///
    /// # Errors
    /// `InvalidRegistry` when the filename is unusable or a header value
    /// is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ReviewError::InvalidRegistry {
                path: path.to_path_buf(),
                reason: "unusable file name".to_string(),
            })?
            .to_string();

        let content = std::fs::read_to_string(path)?;
        let mut descriptor = CheckDescriptor::new(&name, "Generic", Kind::Must, "");

        for line in content.lines() {
            let Some(header) = line.strip_prefix('#').map(str::trim) else {
                continue;
            };
            if let Some(value) = header.strip_prefix("group:") {
                descriptor.group = value.trim().to_string();
            } else if let Some(value) = header.strip_prefix("kind:") {
                descriptor.kind = value.trim().parse().map_err(|e: String| {
                    ReviewError::InvalidRegistry {
                        path: path.to_path_buf(),
                        reason: e,
                    }
                })?;
            } else if let Some(value) = header.strip_prefix("text:") {
                descriptor.text = value.trim().to_string();
            } else if let Some(value) = header.strip_prefix("url:") {
                descriptor.url = value.trim().to_string();
            } else if let Some(value) = header.strip_prefix("needs:") {
                descriptor.needs = split_names(value);
            } else if let Some(value) = header.strip_prefix("deprecates:") {
                descriptor.deprecates = split_names(value);
            }
        }
        if descriptor.text.is_empty() {
            descriptor.text = format!("script check {name}");
        }

        Ok(Self {
            descriptor,
            path: path.to_path_buf(),
        })
    }
}

fn split_names(value: &str) -> std::collections::BTreeSet<String> {
    value
        .split([',', ' '])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

impl Check for ScriptCheck {
    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn run(&self, ctx: &AnalysisContext) -> Result<CheckResult> {
        let output = Command::new("sh")
            .arg(&self.path)
            .env("SPEC", ctx.spec().path())
            .env("SRPM", ctx.srpm().path())
            .env("BUILDDIR", ctx.builddir())
            .env("REVIEW_NAME", ctx.review_name())
            .output()?;

        let outcome = match output.status.code() {
            Some(0) => Outcome::Pass,
            Some(1) => Outcome::Fail,
            Some(2) => Outcome::Pending,
            Some(3) => Outcome::NotApplicable,
            other => {
                let code = other.map_or_else(|| "signal".to_string(), |c| c.to_string());
                return Ok(CheckResult::new(&self.descriptor.name, Outcome::Error)
                    .with_message(&format!("script exited with unexpected status {code}")));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let message = stdout.trim();
        let mut result = CheckResult::new(&self.descriptor.name, outcome);
        if !message.is_empty() {
            result = result.with_message(message);
        }
        Ok(result)
    }
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
