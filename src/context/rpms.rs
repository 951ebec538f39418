use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use globset::Glob;
use regex::Regex;
use walkdir::WalkDir;

use crate::error::{ReviewError, Result};

/// Built binary packages, one file listing per subpackage.
///
/// Paths are stored absolute-style with a leading `/`, the way they would
/// appear on an installed system.
#[derive(Debug, Clone, Default)]
pub struct RpmSet {
    listings: BTreeMap<String, Vec<String>>,
}

impl RpmSet {
    /// Build listings by walking unpacked RPM root directories.
    #[must_use]
    pub fn from_roots(roots: &BTreeMap<String, PathBuf>) -> Self {
        let mut listings = BTreeMap::new();
        for (subpackage, root) in roots {
            let mut files: Vec<String> = WalkDir::new(root)
                .into_iter()
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().is_file())
                .filter_map(|e| {
                    e.path()
                        .strip_prefix(root)
                        .ok()
                        .map(|p| format!("/{}", p.to_string_lossy()))
                })
                .collect();
            files.sort();
            listings.insert(subpackage.clone(), files);
        }
        Self { listings }
    }

    /// Build from precomputed listings (cached runs and tests).
    #[must_use]
    pub const fn from_listings(listings: BTreeMap<String, Vec<String>>) -> Self {
        Self { listings }
    }

    #[must_use]
    pub fn subpackages(&self) -> Vec<&str> {
        self.listings.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Whether any file in any subpackage matches `pattern`.
    ///
    /// The pattern is interpreted both as a glob and as a regex; a hit
    /// under either reading counts. Both readings are tried because glob
    /// syntax treats regex metacharacters as literals, so a regex that
    /// happens to compile as a glob would otherwise match nothing.
    ///
    /// # Errors
    /// Returns an error when the pattern is neither a valid glob nor a
    /// valid regex.
    pub fn find(&self, pattern: &str) -> Result<bool> {
        let glob = Glob::new(pattern).ok().map(|g| g.compile_matcher());
        let re = Regex::new(pattern).ok();
        if glob.is_none() && re.is_none() {
            let source = Glob::new(pattern).expect_err("glob failed above");
            return Err(ReviewError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            });
        }
        Ok(self.all_files().any(|f| {
            glob.as_ref().is_some_and(|m| {
                m.is_match(Path::new(f)) || m.is_match(Path::new(f.trim_start_matches('/')))
            }) || re.as_ref().is_some_and(|r| r.is_match(f))
        }))
    }

    /// Regex match over every subpackage listing; subpackages with no hit
    /// are omitted from the result.
    ///
    /// # Errors
    /// Returns `InvalidRegex` for a malformed pattern.
    pub fn files_matching(&self, pattern: &str) -> Result<BTreeMap<String, Vec<PathBuf>>> {
        let re = Regex::new(pattern).map_err(|source| ReviewError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })?;
        let mut matches = BTreeMap::new();
        for (subpackage, files) in &self.listings {
            let hits: Vec<PathBuf> = files
                .iter()
                .filter(|f| re.is_match(f))
                .map(PathBuf::from)
                .collect();
            if !hits.is_empty() {
                matches.insert(subpackage.clone(), hits);
            }
        }
        Ok(matches)
    }

    fn all_files(&self) -> impl Iterator<Item = &String> {
        self.listings.values().flatten()
    }
}

#[cfg(test)]
#[path = "rpms_tests.rs"]
mod tests;
