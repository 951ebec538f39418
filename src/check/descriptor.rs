use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;

/// Guideline weight of a check; governs report placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Kind {
    Must,
    Should,
    Extra,
    Pending,
}

impl Kind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Must => "MUST",
            Self::Should => "SHOULD",
            Self::Extra => "EXTRA",
            Self::Pending => "PENDING",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MUST" => Ok(Self::Must),
            "SHOULD" => Ok(Self::Should),
            "EXTRA" => Ok(Self::Extra),
            "PENDING" => Ok(Self::Pending),
            _ => Err(format!("Unknown check kind: {s}")),
        }
    }
}

/// Static metadata of a single guideline check.
///
/// Names are unique across all registries once deprecation is resolved.
/// `deprecates` and `needs` may only reference known names; the planner
/// rejects dangling references at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckDescriptor {
    pub name: String,
    pub group: String,
    pub kind: Kind,
    /// `false` means the check only records a manual-review entry.
    pub automatic: bool,
    pub text: String,
    pub url: String,
    /// Checks this one supersedes; they are removed from the plan.
    pub deprecates: BTreeSet<String>,
    /// Checks whose results must be recorded before this one runs.
    pub needs: BTreeSet<String>,
    /// When set, a failed or errored prerequisite makes this check
    /// not-applicable instead of running it against broken inputs.
    pub requires_success: bool,
}

impl CheckDescriptor {
    #[must_use]
    pub fn new(name: &str, group: &str, kind: Kind, text: &str) -> Self {
        Self {
            name: name.to_string(),
            group: group.to_string(),
            kind,
            automatic: true,
            text: text.to_string(),
            url: String::new(),
            deprecates: BTreeSet::new(),
            needs: BTreeSet::new(),
            requires_success: false,
        }
    }

    #[must_use]
    pub fn manual(mut self) -> Self {
        self.automatic = false;
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    #[must_use]
    pub fn deprecating(mut self, names: &[&str]) -> Self {
        self.deprecates = names.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn needing(mut self, names: &[&str]) -> Self {
        self.needs = names.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub const fn requiring_success(mut self) -> Self {
        self.requires_success = true;
        self
    }

    /// Sort key for deterministic plan and report ordering.
    #[must_use]
    pub fn order_key(&self) -> (String, String) {
        (self.group.clone(), self.name.clone())
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
