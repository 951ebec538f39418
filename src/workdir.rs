use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, info};

use crate::error::Result;

const SRPM_DIR: &str = "srpm";
const SRPM_UNPACKED_DIR: &str = "srpm-unpacked";
const UPSTREAM_DIR: &str = "upstream";
const UPSTREAM_UNPACKED_DIR: &str = "upstream-unpacked";
const RESULTS_DIR: &str = "results";

/// Fixed layout under one review's work directory. A prior run's tree is
/// cleared on reuse unless preservation is requested; cached-build modes
/// preserve so `results/` survives.
pub struct WorkDir {
    root: PathBuf,
}

impl WorkDir {
    /// # Errors
    /// Propagates I/O errors clearing or creating the tree.
    pub fn prepare(root: PathBuf, preserve: bool) -> Result<Self> {
        if root.exists() && !preserve {
            info!("clearing prior work directory {}", root.display());
            fs::remove_dir_all(&root)?;
        }
        for sub in [
            SRPM_DIR,
            SRPM_UNPACKED_DIR,
            UPSTREAM_DIR,
            UPSTREAM_UNPACKED_DIR,
            RESULTS_DIR,
        ] {
            fs::create_dir_all(root.join(sub))?;
        }
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn srpm_dir(&self) -> PathBuf {
        self.root.join(SRPM_DIR)
    }

    #[must_use]
    pub fn srpm_unpacked_dir(&self) -> PathBuf {
        self.root.join(SRPM_UNPACKED_DIR)
    }

    #[must_use]
    pub fn upstream_dir(&self) -> PathBuf {
        self.root.join(UPSTREAM_DIR)
    }

    #[must_use]
    pub fn upstream_unpacked_dir(&self) -> PathBuf {
        self.root.join(UPSTREAM_UNPACKED_DIR)
    }

    /// Persisted build products live here across cached runs.
    #[must_use]
    pub fn results_dir(&self) -> PathBuf {
        self.root.join(RESULTS_DIR)
    }

    /// Expand the SRPM payload into `srpm-unpacked/` with
    /// `rpm2cpio | cpio`. Returns the unpacked directory.
    ///
    /// # Errors
    /// Propagates I/O errors, including nonzero exits of either tool.
    pub fn unpack_srpm(&self, srpm: &Path) -> Result<PathBuf> {
        let dest = self.srpm_unpacked_dir();
        debug!("unpacking {} into {}", srpm.display(), dest.display());

        let rpm2cpio = Command::new("rpm2cpio")
            .arg(srpm)
            .stdout(Stdio::piped())
            .output()?;
        if !rpm2cpio.status.success() {
            return Err(io_failure(&format!("rpm2cpio exited with {}", rpm2cpio.status)));
        }

        let mut cpio = Command::new("cpio")
            .args(["-idmu", "--quiet"])
            .current_dir(&dest)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        cpio.stdin
            .take()
            .ok_or_else(|| io_failure("cpio stdin unavailable"))?
            .write_all(&rpm2cpio.stdout)?;
        let status = cpio.wait()?;
        if !status.success() {
            return Err(io_failure(&format!("cpio exited with {status}")));
        }
        Ok(dest)
    }
}

fn io_failure(reason: &str) -> crate::error::ReviewError {
    std::io::Error::other(reason.to_string()).into()
}

/// Report file beside the invocation directory, named after the package.
#[must_use]
pub fn report_path(dir: &Path, package: &str, extension: &str) -> PathBuf {
    dir.join(format!("{package}-review.{extension}"))
}

#[cfg(test)]
#[path = "workdir_tests.rs"]
mod tests;
