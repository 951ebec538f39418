mod descriptor;
mod result;

pub use descriptor::{CheckDescriptor, Kind};
pub use result::{Attachment, CheckResult, Outcome};

use crate::context::AnalysisContext;
use crate::error::Result;

/// A single guideline check.
///
/// Implementations come from three sources: builtin group registries,
/// declarative TOML registries, and on-disk script snippets. All of them
/// expose static metadata through the descriptor and one synchronous
/// `run` operation over the shared analysis context.
pub trait Check {
    fn descriptor(&self) -> &CheckDescriptor;

    /// Per-check applicability, evaluated after the group-level predicate.
    fn applicable(&self, _ctx: &AnalysisContext) -> bool {
        true
    }

    /// Execute the check.
    ///
    /// Never called for deprecated checks or when `automatic` is false.
    ///
    /// # Errors
    /// Returns an error when the check itself fails to execute; the
    /// scheduler contains it as an `error` outcome for this check alone.
    fn run(&self, ctx: &AnalysisContext) -> Result<CheckResult>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
