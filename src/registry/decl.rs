use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::check::{Check, CheckDescriptor, CheckResult, Kind};
use crate::context::AnalysisContext;
use crate::error::{ReviewError, Result};

use super::Registry;

/// Declarative check registry loaded from a TOML file on the
/// `REVIEW_EXT_DIRS` search path.
///
/// Discovery never executes code: the file declares a group, an
/// applicability predicate and a list of checks whose bodies are
/// data-driven assertions over the analysis context. Files that fail
/// schema validation are rejected at load time.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclRegistry {
    group: String,
    #[serde(default)]
    applicable: DeclApplicable,
    #[serde(default, rename = "check")]
    checks: Vec<DeclCheck>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeclApplicable {
    /// Spec-name prefixes, any match enables the group.
    #[serde(default)]
    name_prefix: Vec<String>,
    /// Regex over built-RPM file paths; a hit enables the group.
    #[serde(default)]
    rpm_file_pattern: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeclCheck {
    name: String,
    kind: Kind,
    text: String,
    #[serde(default)]
    url: String,
    #[serde(default = "default_true")]
    automatic: bool,
    #[serde(default)]
    needs: Vec<String>,
    #[serde(default)]
    deprecates: Vec<String>,
    #[serde(default)]
    spec_must_match: Option<String>,
    #[serde(default)]
    spec_must_not_match: Option<String>,
    #[serde(default)]
    rpm_must_contain: Option<String>,
    #[serde(default)]
    rpm_must_not_contain: Option<String>,
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone)]
enum Assertion {
    SpecMustMatch(String),
    SpecMustNotMatch(String),
    RpmMustContain(String),
    RpmMustNotContain(String),
    /// Manual checks assert nothing.
    None,
}

impl DeclCheck {
    fn assertion(&self, path: &Path) -> Result<Assertion> {
        let mut assertions = Vec::new();
        if let Some(p) = &self.spec_must_match {
            assertions.push(Assertion::SpecMustMatch(p.clone()));
        }
        if let Some(p) = &self.spec_must_not_match {
            assertions.push(Assertion::SpecMustNotMatch(p.clone()));
        }
        if let Some(p) = &self.rpm_must_contain {
            assertions.push(Assertion::RpmMustContain(p.clone()));
        }
        if let Some(p) = &self.rpm_must_not_contain {
            assertions.push(Assertion::RpmMustNotContain(p.clone()));
        }

        match (self.automatic, assertions.len()) {
            (false, 0) => Ok(Assertion::None),
            (true, 1) => Ok(assertions.remove(0)),
            (false, _) => Err(invalid(path, &self.name, "manual checks take no assertion")),
            (true, 0) => Err(invalid(path, &self.name, "automatic check needs an assertion")),
            (true, _) => Err(invalid(path, &self.name, "more than one assertion")),
        }
    }
}

fn invalid(path: &Path, check: &str, reason: &str) -> ReviewError {
    ReviewError::InvalidRegistry {
        path: path.to_path_buf(),
        reason: format!("check '{check}': {reason}"),
    }
}

impl DeclRegistry {
    /// Parse and schema-validate a registry file.
    ///
    /// # Errors
    /// `InvalidRegistry` when the schema is violated; `TomlParse` on
    /// malformed TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let registry: Self = toml::from_str(&content)?;
        registry.validate(path)?;
        debug!(
            "loaded registry {} with {} checks from {}",
            registry.group,
            registry.checks.len(),
            path.display()
        );
        Ok(registry)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.group.is_empty() {
            return Err(ReviewError::InvalidRegistry {
                path: path.to_path_buf(),
                reason: "empty group name".to_string(),
            });
        }
        for check in &self.checks {
            if check.name.is_empty() {
                return Err(ReviewError::InvalidRegistry {
                    path: path.to_path_buf(),
                    reason: "check with empty name".to_string(),
                });
            }
            check.assertion(path)?;
        }
        Ok(())
    }
}

impl Registry for DeclRegistry {
    fn group(&self) -> &str {
        &self.group
    }

    fn is_applicable(&self, ctx: &AnalysisContext) -> bool {
        let name = ctx.spec().name();
        if self
            .applicable
            .name_prefix
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
        {
            return true;
        }
        if let Some(pattern) = &self.applicable.rpm_file_pattern {
            // A failed build cannot prove the group applies.
            return ctx
                .rpms()
                .ok()
                .and_then(|rpms| rpms.find(pattern).ok())
                .unwrap_or(false);
        }
        false
    }

    fn checks(&self) -> Vec<Box<dyn Check>> {
        self.checks
            .iter()
            .map(|decl| {
                let mut descriptor =
                    CheckDescriptor::new(&decl.name, &self.group, decl.kind, &decl.text)
                        .with_url(&decl.url);
                descriptor.automatic = decl.automatic;
                descriptor.needs = decl.needs.iter().cloned().collect();
                descriptor.deprecates = decl.deprecates.iter().cloned().collect();
                // Schema validation already ran in load().
                let assertion = decl.assertion(Path::new("")).unwrap_or(Assertion::None);
                Box::new(AssertionCheck {
                    descriptor,
                    assertion,
                }) as Box<dyn Check>
            })
            .collect()
    }
}

struct AssertionCheck {
    descriptor: CheckDescriptor,
    assertion: Assertion,
}

impl Check for AssertionCheck {
    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn run(&self, ctx: &AnalysisContext) -> Result<CheckResult> {
        let name = &self.descriptor.name;
        let result = match &self.assertion {
            Assertion::SpecMustMatch(p) => {
                if ctx.spec().find_re(p)? {
                    CheckResult::pass(name)
                } else {
                    CheckResult::fail(name, &format!("spec does not match '{p}'"))
                }
            }
            Assertion::SpecMustNotMatch(p) => {
                if ctx.spec().find_re(p)? {
                    CheckResult::fail(name, &format!("forbidden pattern '{p}' found in spec"))
                } else {
                    CheckResult::pass(name)
                }
            }
            Assertion::RpmMustContain(p) => {
                if ctx.rpms()?.find(p)? {
                    CheckResult::pass(name)
                } else {
                    CheckResult::fail(name, &format!("no packaged file matches '{p}'"))
                }
            }
            Assertion::RpmMustNotContain(p) => {
                if ctx.rpms()?.find(p)? {
                    CheckResult::fail(name, &format!("packaged files match '{p}'"))
                } else {
                    CheckResult::pass(name)
                }
            }
            Assertion::None => CheckResult::pass(name),
        };
        Ok(result)
    }
}

#[cfg(test)]
#[path = "decl_tests.rs"]
mod tests;
