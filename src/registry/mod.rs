mod decl;
pub mod script;

pub use decl::DeclRegistry;
pub use script::ScriptCheck;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, warn};

use crate::check::Check;
use crate::context::AnalysisContext;
use crate::error::Result;
use crate::registry::builtin::builtin_registries;

pub mod builtin;

/// A plugin-provided container declaring a group and an applicability
/// predicate for a family of checks.
pub trait Registry {
    fn group(&self) -> &str;

    /// Auto-applicability of the whole group, consulted only when the
    /// user has not forced the group on or off.
    fn is_applicable(&self, ctx: &AnalysisContext) -> bool;

    fn checks(&self) -> Vec<Box<dyn Check>>;
}

/// Whether a group contributed checks to the plan, for the report's
/// group summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStatus {
    pub group: String,
    pub applicable: bool,
}

/// Product of registry discovery: check objects keyed by name, in
/// registry order, plus the per-group applicability outcomes.
pub struct LoadedChecks {
    pub checks: IndexMap<String, Box<dyn Check>>,
    pub groups: Vec<GroupStatus>,
}

/// Discovers checks from the builtin registries, declarative TOML
/// registries (`REVIEW_EXT_DIRS`) and script snippets
/// (`REVIEW_SCRIPT_DIRS`), in that precedence order.
pub struct RegistryLoader {
    toggles: BTreeMap<String, bool>,
    ext_dirs: Vec<PathBuf>,
    script_dirs: Vec<PathBuf>,
}

impl RegistryLoader {
    #[must_use]
    pub const fn new(toggles: BTreeMap<String, bool>) -> Self {
        Self {
            toggles,
            ext_dirs: Vec::new(),
            script_dirs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_ext_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.ext_dirs = dirs;
        self
    }

    #[must_use]
    pub fn with_script_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.script_dirs = dirs;
        self
    }

    /// Every registry, without applicability filtering (`--display`).
    ///
    /// # Errors
    /// Returns an error when a declarative registry fails schema
    /// validation.
    pub fn registries(&self) -> Result<Vec<Box<dyn Registry>>> {
        let mut registries = builtin_registries();
        for dir in &self.ext_dirs {
            for path in toml_files(dir) {
                registries.push(Box::new(DeclRegistry::load(&path)?));
            }
        }
        Ok(registries)
    }

    /// Script checks from the script search path. Unparsable snippets are
    /// skipped with a warning.
    #[must_use]
    pub fn script_checks(&self) -> Vec<ScriptCheck> {
        let mut scripts = Vec::new();
        for dir in &self.script_dirs {
            let Ok(entries) = fs::read_dir(dir) else {
                debug!("script dir {} not readable, skipping", dir.display());
                continue;
            };
            let mut paths: Vec<PathBuf> = entries
                .filter_map(std::result::Result::ok)
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "sh"))
                .collect();
            paths.sort();
            for path in paths {
                match ScriptCheck::load(&path) {
                    Ok(script) => scripts.push(script),
                    Err(e) => warn!("skipping script check {}: {e}", path.display()),
                }
            }
        }
        scripts
    }

    /// Resolve group applicability against the context and collect every
    /// check from applicable groups.
    ///
    /// # Errors
    /// Returns an error when a declarative registry fails schema
    /// validation.
    pub fn load(&self, ctx: &AnalysisContext) -> Result<LoadedChecks> {
        let mut checks: IndexMap<String, Box<dyn Check>> = IndexMap::new();
        let mut groups = Vec::new();

        for registry in self.registries()? {
            let applicable = self.group_enabled(registry.group(), ctx, registry.as_ref());
            groups.push(GroupStatus {
                group: registry.group().to_string(),
                applicable,
            });
            if !applicable {
                debug!("group {} not applicable, skipped", registry.group());
                continue;
            }
            for check in registry.checks() {
                insert_check(&mut checks, check);
            }
        }

        for script in self.script_checks() {
            // Script groups honor user toggles but carry no auto predicate.
            let group = script.descriptor().group.clone();
            if self.toggles.get(&group) == Some(&false) {
                debug!("script group {group} disabled by user");
                continue;
            }
            insert_check(&mut checks, Box::new(script));
        }

        Ok(LoadedChecks { checks, groups })
    }

    /// Three-valued gate: explicit user override wins, otherwise the
    /// registry's own predicate decides.
    fn group_enabled(&self, group: &str, ctx: &AnalysisContext, registry: &dyn Registry) -> bool {
        match self.toggles.get(group) {
            Some(enabled) => *enabled,
            None => registry.is_applicable(ctx),
        }
    }
}

fn insert_check(checks: &mut IndexMap<String, Box<dyn Check>>, check: Box<dyn Check>) {
    let name = check.descriptor().name.clone();
    if checks.contains_key(&name) {
        warn!("duplicate check name '{name}', keeping the first definition");
        return;
    }
    checks.insert(name, check);
}

fn toml_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        debug!("ext dir {} not readable, skipping", dir.display());
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();
    paths
}

/// Split a colon-separated search path into directories.
#[must_use]
pub fn split_search_path(value: &str) -> Vec<PathBuf> {
    value
        .split(':')
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
