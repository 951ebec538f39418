use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Handle on the fetched source RPM and its unpacked contents.
#[derive(Debug, Clone)]
pub struct Srpm {
    path: PathBuf,
    unpacked: PathBuf,
}

impl Srpm {
    #[must_use]
    pub const fn new(path: PathBuf, unpacked: PathBuf) -> Self {
        Self { path, unpacked }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn unpacked_path(&self) -> &Path {
        &self.unpacked
    }

    /// Relative paths of everything inside the unpacked tree, sorted.
    #[must_use]
    pub fn files(&self) -> Vec<String> {
        let mut files: Vec<String> = WalkDir::new(&self.unpacked)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                e.path()
                    .strip_prefix(&self.unpacked)
                    .ok()
                    .map(|p| p.to_string_lossy().to_string())
            })
            .collect();
        files.sort();
        files
    }

    /// Absolute paths of the packaged sources (everything but the spec).
    #[must_use]
    pub fn source_files(&self) -> Vec<PathBuf> {
        let mut sources: Vec<PathBuf> = WalkDir::new(&self.unpacked)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .filter(|p| p.extension().is_none_or(|ext| ext != "spec"))
            .collect();
        sources.sort();
        sources
    }
}

#[cfg(test)]
#[path = "srpm_tests.rs"]
mod tests;
