use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use regex::Regex;

use crate::error::{ReviewError, Result};

/// Parsed spec file with queryable tags and regex search over the body.
///
/// When `rpmspec` is on PATH the body is the macro-expanded form; otherwise
/// queries run against the raw text. Local `%global`/`%define` values are
/// substituted into tag values either way.
#[derive(Debug, Clone)]
pub struct SpecFile {
    path: PathBuf,
    body: String,
    tags: Vec<(String, String)>,
}

impl SpecFile {
    /// Read and parse a spec file from disk.
    ///
    /// # Errors
    /// Returns `SpecParse` when the file cannot be read or carries no
    /// `Name:` tag.
    pub fn parse(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ReviewError::SpecParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let body = expand_with_rpmspec(path).unwrap_or(raw);
        Self::from_text(path, &body)
    }

    /// Parse pre-read spec text. No external expansion is attempted.
    ///
    /// # Errors
    /// Returns `SpecParse` when no `Name:` tag is present.
    pub fn from_text(path: &Path, text: &str) -> Result<Self> {
        let defines = collect_defines(text);
        let tags = collect_tags(text, &defines);

        let spec = Self {
            path: path.to_path_buf(),
            body: text.to_string(),
            tags,
        };
        if spec.find_tag("Name").is_empty() {
            return Err(ReviewError::SpecParse {
                path: path.to_path_buf(),
                reason: "no Name: tag".to_string(),
            });
        }
        Ok(spec)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Package name from the `Name:` tag.
    #[must_use]
    pub fn name(&self) -> String {
        self.find_tag("Name").first().cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn version(&self) -> String {
        self.find_tag("Version")
            .first()
            .cloned()
            .unwrap_or_default()
    }

    /// All values of a tag, case-insensitive. Numbered tags fold into
    /// their base name: `find_tag("Source")` also returns `Source0`,
    /// `Source1` and so on.
    #[must_use]
    pub fn find_tag(&self, tag: &str) -> Vec<String> {
        let wanted = tag.to_lowercase();
        self.tags
            .iter()
            .filter(|(name, _)| {
                let base = name.trim_end_matches(|c: char| c.is_ascii_digit());
                name == &wanted || base == wanted
            })
            .map(|(_, value)| value.clone())
            .collect()
    }

    /// Individual `BuildRequires` entries, comma and whitespace separated,
    /// version constraints stripped.
    #[must_use]
    pub fn build_requires(&self) -> Vec<String> {
        split_requires(&self.find_tag("BuildRequires"))
    }

    #[must_use]
    pub fn requires(&self) -> Vec<String> {
        split_requires(&self.find_tag("Requires"))
    }

    #[must_use]
    pub fn sources(&self) -> Vec<String> {
        self.find_tag("Source")
    }

    /// Regex search over the (expanded) spec body.
    ///
    /// # Errors
    /// Returns `InvalidRegex` for a malformed pattern.
    pub fn find_re(&self, pattern: &str) -> Result<bool> {
        let re = Regex::new(pattern).map_err(|source| ReviewError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(re.is_match(&self.body))
    }
}

/// Expand macros via `rpmspec -P` when the tool is available.
fn expand_with_rpmspec(path: &Path) -> Option<String> {
    let output = Command::new("rpmspec")
        .arg("-P")
        .arg(path)
        .output()
        .ok()?;
    if output.status.success() {
        String::from_utf8(output.stdout).ok()
    } else {
        None
    }
}

fn collect_defines(text: &str) -> HashMap<String, String> {
    let mut defines = HashMap::new();
    for line in text.lines() {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("%global" | "%define") => {
                if let (Some(key), Some(value)) = (parts.next(), parts.next()) {
                    defines.insert(key.to_string(), value.to_string());
                }
            }
            _ => {}
        }
    }
    defines
}

fn collect_tags(text: &str, defines: &HashMap<String, String>) -> Vec<(String, String)> {
    let tag_re = Regex::new(r"^([A-Za-z][A-Za-z0-9_]*)\s*:\s*(\S.*)$").expect("static regex");
    let mut tags = Vec::new();
    for line in text.lines() {
        if let Some(caps) = tag_re.captures(line) {
            let name = caps[1].to_lowercase();
            let value = substitute_macros(caps[2].trim(), defines);
            tags.push((name, value));
        }
    }
    tags
}

/// Resolve `%{key}` occurrences against locally defined macros. Unknown
/// macros are left in place.
fn substitute_macros(value: &str, defines: &HashMap<String, String>) -> String {
    let mut result = value.to_string();
    for (key, val) in defines {
        result = result.replace(&format!("%{{{key}}}"), val);
    }
    result
}

fn split_requires(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .flat_map(str::split_whitespace)
        .filter(|token| {
            token
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '%' || c == '/')
        })
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
#[path = "spec_tests.rs"]
mod tests;
