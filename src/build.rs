use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};

use crate::context::RpmSet;
use crate::error::{ReviewError, Result};

/// Everything the expensive build step yields: binary package listings,
/// build logs and the static linter output.
#[derive(Debug, Clone, Default)]
pub struct BuildProducts {
    pub rpms: RpmSet,
    pub logs: Vec<String>,
    pub rpmlint: String,
}

/// Seam for the isolated-build driver. One real driver shells out to
/// `mock`; cached and prebuilt variants skip the build entirely.
pub trait Builder {
    /// Compile the SRPM and collect products.
    ///
    /// # Errors
    /// Returns `BuildFailure` when the build or product collection fails.
    fn build(&self, srpm: &Path, workdir: &Path) -> Result<BuildProducts>;
}

/// Runs the build at most once per review, lazily, on the first context
/// query that needs built artifacts. A failure is cached and replayed to
/// every later caller; there are no retries within a run.
pub struct BuildCoordinator {
    builder: Box<dyn Builder>,
    srpm: PathBuf,
    workdir: PathBuf,
    persist_dir: Option<PathBuf>,
    slot: OnceCell<std::result::Result<BuildProducts, String>>,
}

impl BuildCoordinator {
    #[must_use]
    pub fn new(builder: Box<dyn Builder>, srpm: PathBuf, workdir: PathBuf) -> Self {
        Self {
            builder,
            srpm,
            workdir,
            persist_dir: None,
            slot: OnceCell::new(),
        }
    }

    /// Persist products under `dir` after a successful build, so a later
    /// `--cache` run can reuse them without re-invoking the driver.
    #[must_use]
    pub fn persisting_to(mut self, dir: PathBuf) -> Self {
        self.persist_dir = Some(dir);
        self
    }

    /// Run the build if it has not been attempted yet and return the
    /// (possibly cached) products.
    ///
    /// # Errors
    /// Replays `BuildFailure` with the original reason on every call once
    /// the build has failed.
    pub fn ensure(&self) -> Result<&BuildProducts> {
        let slot = self.slot.get_or_init(|| {
            info!("building {} in isolated root", self.srpm.display());
            match self.builder.build(&self.srpm, &self.workdir) {
                Ok(products) => {
                    if let Some(dir) = &self.persist_dir
                        && let Err(e) = persist_products(dir, &products)
                    {
                        debug!("could not persist build products: {e}");
                    }
                    Ok(products)
                }
                Err(e) => Err(e.to_string()),
            }
        });
        match slot {
            Ok(products) => Ok(products),
            Err(reason) => Err(ReviewError::BuildFailure(strip_prefix(reason))),
        }
    }

    /// Whether the build has been attempted (successfully or not).
    #[must_use]
    pub fn attempted(&self) -> bool {
        self.slot.get().is_some()
    }

    /// The cached failure reason, if the attempted build failed.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        match self.slot.get() {
            Some(Err(reason)) => Some(strip_prefix(reason)),
            _ => None,
        }
    }
}

/// The cached string already carries the `build failed: ` prefix when the
/// builder returned a `BuildFailure`; avoid doubling it on replay.
fn strip_prefix(reason: &str) -> String {
    reason
        .strip_prefix("build failed: ")
        .unwrap_or(reason)
        .to_string()
}

/// Fixed products, used for `--prebuilt` trees and in tests.
pub struct StaticBuilder {
    products: BuildProducts,
}

impl StaticBuilder {
    #[must_use]
    pub const fn new(products: BuildProducts) -> Self {
        Self { products }
    }
}

impl Builder for StaticBuilder {
    fn build(&self, _srpm: &Path, _workdir: &Path) -> Result<BuildProducts> {
        Ok(self.products.clone())
    }
}

/// Drives `mock` to rebuild the SRPM in an ephemeral root, then collects
/// file listings with `rpm -qpl` and linter output with `rpmlint`.
pub struct MockBuilder {
    config: Option<String>,
    options: Vec<String>,
}

impl MockBuilder {
    #[must_use]
    pub const fn new(config: Option<String>, options: Vec<String>) -> Self {
        Self { config, options }
    }
}

impl Builder for MockBuilder {
    fn build(&self, srpm: &Path, workdir: &Path) -> Result<BuildProducts> {
        let resultdir = workdir.join("mock-results");
        fs::create_dir_all(&resultdir)?;

        let mut cmd = Command::new("mock");
        if let Some(config) = &self.config {
            cmd.arg("-r").arg(config);
        }
        cmd.args(&self.options);
        cmd.arg("--resultdir").arg(&resultdir);
        cmd.arg("--rebuild").arg(srpm);

        let output = cmd
            .output()
            .map_err(|e| ReviewError::BuildFailure(format!("cannot run mock: {e}")))?;
        if !output.status.success() {
            return Err(ReviewError::BuildFailure(format!(
                "mock exited with {}",
                output.status
            )));
        }

        let rpm_paths = collect_rpms(&resultdir)?;
        if rpm_paths.is_empty() {
            return Err(ReviewError::BuildFailure(
                "mock produced no binary packages".to_string(),
            ));
        }

        Ok(BuildProducts {
            rpms: query_listings(&rpm_paths)?,
            logs: collect_logs(&resultdir),
            rpmlint: run_rpmlint(&rpm_paths),
        })
    }
}

/// Reuses RPMs the packager built outside the review (`--prebuilt`).
pub struct PrebuiltBuilder {
    rpm_dir: PathBuf,
}

impl PrebuiltBuilder {
    #[must_use]
    pub const fn new(rpm_dir: PathBuf) -> Self {
        Self { rpm_dir }
    }
}

impl Builder for PrebuiltBuilder {
    fn build(&self, _srpm: &Path, _workdir: &Path) -> Result<BuildProducts> {
        let rpm_paths = collect_rpms(&self.rpm_dir)?;
        if rpm_paths.is_empty() {
            return Err(ReviewError::BuildFailure(format!(
                "no prebuilt packages under {}",
                self.rpm_dir.display()
            )));
        }
        Ok(BuildProducts {
            rpms: query_listings(&rpm_paths)?,
            logs: Vec::new(),
            rpmlint: run_rpmlint(&rpm_paths),
        })
    }
}

/// Loads products persisted by a prior run (`--cache`, `--no-build`).
pub struct CachedBuilder {
    dir: PathBuf,
}

impl CachedBuilder {
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl Builder for CachedBuilder {
    fn build(&self, _srpm: &Path, _workdir: &Path) -> Result<BuildProducts> {
        load_products(&self.dir).ok_or_else(|| {
            ReviewError::BuildFailure(format!(
                "no cached build results under {}",
                self.dir.display()
            ))
        })
    }
}

fn collect_rpms(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut rpms = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if name.ends_with(".rpm") && !name.ends_with(".src.rpm") {
            rpms.push(path);
        }
    }
    rpms.sort();
    Ok(rpms)
}

fn collect_logs(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut logs: Vec<String> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "log"))
        .filter_map(|p| fs::read_to_string(&p).ok())
        .collect();
    logs.sort();
    logs
}

fn query_listings(rpm_paths: &[PathBuf]) -> Result<RpmSet> {
    let mut listings = BTreeMap::new();
    for rpm in rpm_paths {
        let name = subpackage_name(rpm);
        let output = Command::new("rpm")
            .args(["-qpl", "--nosignature"])
            .arg(rpm)
            .output()
            .map_err(|e| ReviewError::BuildFailure(format!("cannot run rpm -qpl: {e}")))?;
        let mut files: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(ToString::to_string)
            .collect();
        files.sort();
        listings.insert(name, files);
    }
    Ok(RpmSet::from_listings(listings))
}

/// `foo-devel-1.0-1.fc40.x86_64.rpm` → `foo-devel`.
fn subpackage_name(rpm: &Path) -> String {
    let stem = rpm
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .trim_end_matches(".rpm");
    let parts: Vec<&str> = stem.rsplitn(3, '-').collect();
    parts.last().map_or_else(|| stem.to_string(), |p| (*p).to_string())
}

fn run_rpmlint(rpm_paths: &[PathBuf]) -> String {
    let output = Command::new("rpmlint").args(rpm_paths).output();
    match output {
        Ok(out) => String::from_utf8_lossy(&out.stdout).to_string(),
        Err(e) => format!("rpmlint not available: {e}\n"),
    }
}

const RPMLINT_FILE: &str = "rpmlint.txt";
const BUILD_LOG_FILE: &str = "build.log";
const LISTING_DIR: &str = "files";

fn persist_products(dir: &Path, products: &BuildProducts) -> std::io::Result<()> {
    fs::create_dir_all(dir.join(LISTING_DIR))?;
    fs::write(dir.join(RPMLINT_FILE), &products.rpmlint)?;
    fs::write(dir.join(BUILD_LOG_FILE), products.logs.join("\n"))?;
    for subpackage in products.rpms.subpackages() {
        let listing = products
            .rpms
            .files_matching(".*")
            .ok()
            .and_then(|m| m.get(subpackage).cloned())
            .unwrap_or_default();
        let lines: Vec<String> = listing
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();
        fs::write(
            dir.join(LISTING_DIR).join(format!("{subpackage}.list")),
            lines.join("\n"),
        )?;
    }
    Ok(())
}

fn load_products(dir: &Path) -> Option<BuildProducts> {
    let rpmlint = fs::read_to_string(dir.join(RPMLINT_FILE)).ok()?;
    let logs = fs::read_to_string(dir.join(BUILD_LOG_FILE))
        .map(|s| if s.is_empty() { Vec::new() } else { vec![s] })
        .unwrap_or_default();

    let mut listings = BTreeMap::new();
    for entry in fs::read_dir(dir.join(LISTING_DIR)).ok()? {
        let path = entry.ok()?.path();
        let subpackage = path.file_stem()?.to_string_lossy().to_string();
        let files: Vec<String> = fs::read_to_string(&path)
            .ok()?
            .lines()
            .filter(|l| !l.is_empty())
            .map(ToString::to_string)
            .collect();
        listings.insert(subpackage, files);
    }
    Some(BuildProducts {
        rpms: RpmSet::from_listings(listings),
        logs,
        rpmlint,
    })
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
