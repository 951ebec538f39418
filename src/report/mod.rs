mod text;
mod xml;

pub use text::TextRenderer;
pub use xml::XmlRenderer;

use std::fmt;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::check::{Attachment, Kind, Outcome};
use crate::error::Result;
use crate::registry::GroupStatus;
use crate::scheduler::RecordedResult;

/// One line of the report: a check and what it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub name: String,
    pub group: String,
    pub kind: Kind,
    pub outcome: Outcome,
    pub text: String,
    pub url: String,
    pub message: Option<String>,
}

/// A (kind, outcome-slot) bucket of entries, ordered by group then name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub title: String,
    pub entries: Vec<ReportEntry>,
}

/// SHA-256 of one file shipped in the source package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceChecksum {
    pub file: String,
    pub sha256: String,
}

/// Structured review, ready for a renderer. Aggregation orders entries;
/// renderers only format bytes.
#[derive(Debug, Clone)]
pub struct ReviewDocument {
    pub package: String,
    /// Run-level failure (a failed build, typically); leads the report.
    pub error: Option<String>,
    pub sections: Vec<ReportSection>,
    pub groups: Vec<GroupStatus>,
    pub rpmlint: String,
    pub checksums: Vec<SourceChecksum>,
    pub attachments: Vec<Attachment>,
}

/// Renders a structured review into one output format.
pub trait Renderer {
    fn extension(&self) -> &'static str;

    /// # Errors
    /// Returns `Renderer` when the document cannot be formatted.
    fn render(&self, doc: &ReviewDocument) -> Result<String>;
}

/// Outcome placement within a kind. Errors sort with failures so broken
/// checks surface at the top; not-applicable entries sort with passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Slot {
    Fail,
    Pending,
    Manual,
    Pass,
}

impl Slot {
    const ALL: [Self; 4] = [Self::Fail, Self::Pending, Self::Manual, Self::Pass];

    const fn of(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Fail | Outcome::Error => Self::Fail,
            Outcome::Pending => Self::Pending,
            Outcome::Manual => Self::Manual,
            Outcome::Pass | Outcome::NotApplicable => Self::Pass,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fail => "fail",
            Self::Pending => "pending",
            Self::Manual => "manual",
            Self::Pass => "pass",
        })
    }
}

const KIND_ORDER: [Kind; 4] = [Kind::Must, Kind::Should, Kind::Extra, Kind::Pending];

/// Partition recorded results into the fixed section order and collect
/// the auxiliary tables. Internal-only results are dropped here; they ran
/// solely to satisfy a selected check's dependencies.
#[must_use]
pub fn aggregate(
    package: &str,
    results: &[RecordedResult],
    groups: Vec<GroupStatus>,
    rpmlint: &str,
    checksums: Vec<SourceChecksum>,
    error: Option<String>,
) -> ReviewDocument {
    let reportable: Vec<&RecordedResult> = results.iter().filter(|r| !r.internal).collect();

    let mut sections = Vec::new();
    for kind in KIND_ORDER {
        for slot in Slot::ALL {
            let mut entries: Vec<ReportEntry> = reportable
                .iter()
                .filter(|r| r.descriptor.kind == kind && Slot::of(r.result.outcome) == slot)
                .map(|r| ReportEntry {
                    name: r.descriptor.name.clone(),
                    group: r.descriptor.group.clone(),
                    kind,
                    outcome: r.result.outcome,
                    text: r.descriptor.text.clone(),
                    url: r.descriptor.url.clone(),
                    message: r.result.message.clone(),
                })
                .collect();
            if entries.is_empty() {
                continue;
            }
            entries.sort_by_key(|e| (e.group.clone(), e.name.clone()));
            sections.push(ReportSection {
                title: format!("{kind} {slot}"),
                entries,
            });
        }
    }

    let attachments = reportable
        .iter()
        .flat_map(|r| r.result.attachments.iter().cloned())
        .collect();

    ReviewDocument {
        package: package.to_string(),
        error,
        sections,
        groups,
        rpmlint: rpmlint.to_string(),
        checksums,
        attachments,
    }
}

/// SHA-256 every file in the unpacked source package, sorted by name.
///
/// # Errors
/// Propagates I/O errors reading a source file.
pub fn source_checksums(files: &[std::path::PathBuf]) -> Result<Vec<SourceChecksum>> {
    let mut checksums = Vec::new();
    for path in files {
        checksums.push(SourceChecksum {
            file: file_name(path),
            sha256: sha256_file(path)?,
        });
    }
    checksums.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(checksums)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.to_string_lossy().to_string(), |n| n.to_string_lossy().to_string())
}

fn sha256_file(path: &Path) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(std::fs::read(path)?);
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
