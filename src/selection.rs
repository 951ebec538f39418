use std::collections::{BTreeMap, BTreeSet};

use log::warn;

use crate::check::CheckDescriptor;

/// User-supplied check selectors from the CLI and configuration.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub include: BTreeSet<String>,
    pub exclude: BTreeSet<String>,
    pub single: Option<String>,
}

/// The selection resolved against a concrete plan: which checks execute,
/// and which of those appear in the report. Prerequisites pulled in only
/// through `needs` run internal-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPlan {
    pub run: BTreeSet<String>,
    pub report: BTreeSet<String>,
}

impl SelectionPlan {
    #[must_use]
    pub fn is_internal_only(&self, name: &str) -> bool {
        self.run.contains(name) && !self.report.contains(name)
    }
}

impl Selection {
    #[must_use]
    pub fn from_cli(single: Option<&str>, exclude: &[String]) -> Self {
        Self {
            include: BTreeSet::new(),
            exclude: exclude
                .iter()
                .flat_map(|e| e.split(','))
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            single: single.map(ToString::to_string),
        }
    }

    /// Resolve selectors against the plan. `single` overrides both lists;
    /// otherwise the reported set is `(all ∪ include) \ exclude`. Unknown
    /// names only warn. Needed-but-unselected checks still run, marked
    /// internal-only.
    #[must_use]
    pub fn apply(&self, plan: &[CheckDescriptor]) -> SelectionPlan {
        let known: BTreeSet<&str> = plan.iter().map(|d| d.name.as_str()).collect();
        self.warn_unknown(&known);

        let report: BTreeSet<String> = if let Some(single) = &self.single {
            known
                .iter()
                .filter(|n| *n == single)
                .map(ToString::to_string)
                .collect()
        } else {
            known
                .iter()
                .map(ToString::to_string)
                .chain(self.include.iter().cloned())
                .filter(|n| known.contains(n.as_str()) && !self.exclude.contains(n))
                .collect()
        };

        let needs: BTreeMap<&str, &BTreeSet<String>> =
            plan.iter().map(|d| (d.name.as_str(), &d.needs)).collect();
        let mut run = report.clone();
        let mut frontier: Vec<String> = run.iter().cloned().collect();
        while let Some(name) = frontier.pop() {
            for need in needs.get(name.as_str()).copied().into_iter().flatten() {
                if run.insert(need.clone()) {
                    frontier.push(need.clone());
                }
            }
        }

        SelectionPlan { run, report }
    }

    fn warn_unknown(&self, known: &BTreeSet<&str>) {
        let mentioned = self
            .single
            .iter()
            .chain(self.include.iter())
            .chain(self.exclude.iter());
        for name in mentioned {
            if !known.contains(name.as_str()) {
                warn!("selector names unknown check '{name}'");
            }
        }
    }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod tests;
