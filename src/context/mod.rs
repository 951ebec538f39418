mod rpms;
mod spec;
mod srpm;

pub use rpms::RpmSet;
pub use spec::SpecFile;
pub use srpm::Srpm;

use std::path::{Path, PathBuf};

use crate::build::BuildCoordinator;
use crate::error::Result;

/// Shared read-only view over everything the checks analyze: the parsed
/// spec, the source RPM, built binary packages and unpacked upstream
/// trees. Constructed once per invocation; checks never mutate it.
///
/// Built artifacts are produced lazily through the build coordinator; the
/// first query that needs them triggers the (at most one) build.
pub struct AnalysisContext {
    spec: SpecFile,
    srpm: Srpm,
    build: BuildCoordinator,
    upstream: Vec<PathBuf>,
    builddir: PathBuf,
}

impl AnalysisContext {
    #[must_use]
    pub fn new(
        spec: SpecFile,
        srpm: Srpm,
        build: BuildCoordinator,
        upstream: Vec<PathBuf>,
        builddir: PathBuf,
    ) -> Self {
        Self {
            spec,
            srpm,
            build,
            upstream,
            builddir,
        }
    }

    #[must_use]
    pub const fn spec(&self) -> &SpecFile {
        &self.spec
    }

    #[must_use]
    pub const fn srpm(&self) -> &Srpm {
        &self.srpm
    }

    /// File listings of the built binary packages. Triggers the shared
    /// build on first use.
    ///
    /// # Errors
    /// Replays `BuildFailure` when the (single) build attempt failed.
    pub fn rpms(&self) -> Result<&RpmSet> {
        self.build.ensure().map(|p| &p.rpms)
    }

    /// Build logs from the isolated root. Triggers the shared build.
    ///
    /// # Errors
    /// Replays `BuildFailure` when the build attempt failed.
    pub fn build_logs(&self) -> Result<&[String]> {
        self.build.ensure().map(|p| p.logs.as_slice())
    }

    /// Verbatim rpmlint output. Triggers the shared build.
    ///
    /// # Errors
    /// Replays `BuildFailure` when the build attempt failed.
    pub fn rpmlint_output(&self) -> Result<&str> {
        self.build.ensure().map(|p| p.rpmlint.as_str())
    }

    /// The cached build failure, if any. Never triggers a build.
    #[must_use]
    pub fn build_error(&self) -> Option<String> {
        self.build.error()
    }

    #[must_use]
    pub fn upstream_trees(&self) -> &[PathBuf] {
        &self.upstream
    }

    /// Work directory handed to script checks as `BUILDDIR`.
    #[must_use]
    pub fn builddir(&self) -> &Path {
        &self.builddir
    }

    /// Package name under review; names the report file.
    #[must_use]
    pub fn review_name(&self) -> String {
        self.spec.name()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
