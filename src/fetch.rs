use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use regex::Regex;

use crate::error::{ReviewError, Result};

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Where the review artifacts come from; exactly one per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    /// Ticket id; the tracker page links the spec and SRPM.
    Bug(String),
    /// Direct URL of a source RPM.
    Url(String),
    /// Basename of a spec/SRPM pair already in the working directory.
    Name(String),
}

/// Artifact paths after fetching. The spec may be absent when only an
/// SRPM was published; the unpacked SRPM supplies it then.
#[derive(Debug, Clone)]
pub struct FetchedArtifacts {
    pub srpm: PathBuf,
    pub spec: Option<PathBuf>,
}

/// HTTP seam for dependency injection.
pub trait Downloader {
    /// # Errors
    /// Returns `Download` on request failure or a non-2xx status.
    fn get_text(&self, url: &str) -> Result<String>;

    /// # Errors
    /// Returns `Download` on request failure or a non-2xx status.
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Production client using reqwest.
#[derive(Debug, Default)]
pub struct ReqwestDownloader;

impl ReqwestDownloader {
    fn get(url: &str) -> Result<reqwest::blocking::Response> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ReviewError::Config(format!("cannot create HTTP client: {e}")))?;
        client
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|source| ReviewError::Download {
                url: url.to_string(),
                source: Box::new(source),
            })
    }
}

impl Downloader for ReqwestDownloader {
    fn get_text(&self, url: &str) -> Result<String> {
        Self::get(url)?.text().map_err(|source| ReviewError::Download {
            url: url.to_string(),
            source: Box::new(source),
        })
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = Self::get(url)?
            .bytes()
            .map_err(|source| ReviewError::Download {
                url: url.to_string(),
                source: Box::new(source),
            })?;
        Ok(bytes.to_vec())
    }
}

/// Resolves an artifact source into local spec/SRPM files under the work
/// directory. Network access is refused outright in offline mode.
pub struct Fetcher<'a> {
    downloader: &'a dyn Downloader,
    offline: bool,
    bug_url_template: String,
}

impl<'a> Fetcher<'a> {
    pub fn new(downloader: &'a dyn Downloader, offline: bool, bug_url_template: &str) -> Self {
        Self {
            downloader,
            offline,
            bug_url_template: bug_url_template.to_string(),
        }
    }

    /// Fetch (or locate) the artifacts, placing downloads under `dest`.
    /// `search_dir` is consulted only for `Name` sources.
    ///
    /// # Errors
    /// `Config` when a network source is used offline;
    /// `ArtifactNotFound` when no SRPM can be located.
    pub fn fetch(
        &self,
        source: &ArtifactSource,
        search_dir: &Path,
        dest: &Path,
    ) -> Result<FetchedArtifacts> {
        match source {
            ArtifactSource::Bug(id) => self.fetch_bug(id, dest),
            ArtifactSource::Url(url) => self.fetch_url(url, dest),
            ArtifactSource::Name(name) => fetch_local(name, search_dir, dest),
        }
    }

    fn require_online(&self, reference: &str) -> Result<()> {
        if self.offline {
            return Err(ReviewError::Config(format!(
                "offline mode, cannot fetch {reference}"
            )));
        }
        Ok(())
    }

    fn fetch_bug(&self, id: &str, dest: &Path) -> Result<FetchedArtifacts> {
        self.require_online(&format!("bug {id}"))?;
        let url = self.bug_url_template.replace("{id}", id);
        info!("scanning {url} for artifact links");
        let page = self.downloader.get_text(&url)?;

        let srpm_url = last_link(&page, r#"https?://[^\s"'<>]+?\.src\.rpm"#)
            .ok_or_else(|| ReviewError::ArtifactNotFound {
            reference: format!("bug {id}: no source RPM link"),
        })?;
        let spec_url = last_link(&page, r#"https?://[^\s"'<>]+?\.spec"#);

        let srpm = self.download(&srpm_url, dest)?;
        let spec = match spec_url {
            Some(spec_url) => Some(self.download(&spec_url, dest)?),
            None => None,
        };
        Ok(FetchedArtifacts { srpm, spec })
    }

    fn fetch_url(&self, url: &str, dest: &Path) -> Result<FetchedArtifacts> {
        self.require_online(url)?;
        if !url.ends_with(".src.rpm") {
            return Err(ReviewError::Config(format!(
                "--url must point at a .src.rpm file, got {url}"
            )));
        }
        Ok(FetchedArtifacts {
            srpm: self.download(url, dest)?,
            spec: None,
        })
    }

    /// Download one URL into `dest`, keeping its filename. Callers gate
    /// on offline mode themselves.
    ///
    /// # Errors
    /// `Download` on request failure, `Io` writing the file.
    pub fn download(&self, url: &str, dest: &Path) -> Result<PathBuf> {
        let name = url.rsplit('/').next().unwrap_or(url);
        let target = dest.join(name);
        info!("downloading {url}");
        let bytes = self.downloader.get_bytes(url)?;
        fs::write(&target, bytes)?;
        Ok(target)
    }
}

/// Newest link wins; trackers accumulate superseded uploads over time.
fn last_link(page: &str, pattern: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    re.find_iter(page).last().map(|m| m.as_str().to_string())
}

/// `Name` mode: `<search_dir>/<name>.spec` plus the lexicographically
/// last `<name>*.src.rpm` beside it, copied into the work directory.
fn fetch_local(name: &str, search_dir: &Path, dest: &Path) -> Result<FetchedArtifacts> {
    let spec_path = search_dir.join(format!("{name}.spec"));
    if !spec_path.is_file() {
        return Err(ReviewError::ArtifactNotFound {
            reference: spec_path.display().to_string(),
        });
    }

    let mut candidates: Vec<PathBuf> = fs::read_dir(search_dir)?
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(name) && n.ends_with(".src.rpm"))
        })
        .collect();
    candidates.sort();
    let srpm_path = candidates.pop().ok_or_else(|| ReviewError::ArtifactNotFound {
        reference: format!("{name}*.src.rpm in {}", search_dir.display()),
    })?;
    debug!("using local artifacts {} and {}", spec_path.display(), srpm_path.display());

    let spec = dest.join(spec_path.file_name().unwrap_or_default());
    let srpm = dest.join(srpm_path.file_name().unwrap_or_default());
    fs::copy(&spec_path, &spec)?;
    fs::copy(&srpm_path, &srpm)?;
    Ok(FetchedArtifacts {
        srpm,
        spec: Some(spec),
    })
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
