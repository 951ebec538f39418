mod generic;
mod haskell;
mod java;
mod ocaml;
mod php;
mod python;
mod sugar;

use crate::check::{Check, CheckDescriptor, CheckResult, Outcome};
use crate::context::AnalysisContext;
use crate::error::Result;

use super::Registry;

/// All compiled-in group registries, in report order.
#[must_use]
pub fn builtin_registries() -> Vec<Box<dyn Registry>> {
    vec![
        Box::new(generic::GenericRegistry),
        Box::new(haskell::HaskellRegistry),
        Box::new(java::JavaRegistry),
        Box::new(ocaml::OcamlRegistry),
        Box::new(php::PhpRegistry),
        Box::new(python::PythonRegistry),
        Box::new(sugar::SugarRegistry),
    ]
}

type RunFn = fn(&CheckDescriptor, &AnalysisContext) -> Result<CheckResult>;

/// Descriptor plus a plain function body; all builtin checks are this
/// shape.
pub(super) struct BuiltinCheck {
    descriptor: CheckDescriptor,
    run_fn: RunFn,
}

impl BuiltinCheck {
    pub(super) const fn new(descriptor: CheckDescriptor, run_fn: RunFn) -> Self {
        Self { descriptor, run_fn }
    }

    /// A check the reviewer must answer by hand; `run` is never invoked.
    pub(super) fn manual(descriptor: CheckDescriptor) -> Self {
        Self::new(descriptor.manual(), |d, _| {
            Ok(CheckResult::new(&d.name, Outcome::Manual))
        })
    }
}

impl Check for BuiltinCheck {
    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn run(&self, ctx: &AnalysisContext) -> Result<CheckResult> {
        (self.run_fn)(&self.descriptor, ctx)
    }
}

/// Group predicate: the spec name carries a language prefix.
pub(super) fn name_has_prefix(ctx: &AnalysisContext, prefix: &str) -> bool {
    ctx.spec().name().starts_with(prefix)
}

/// Group predicate: the built packages carry a diagnostic file. A failed
/// or absent build cannot prove the group applies.
pub(super) fn rpms_have(ctx: &AnalysisContext, pattern: &str) -> bool {
    ctx.rpms()
        .ok()
        .and_then(|rpms| rpms.find(pattern).ok())
        .unwrap_or(false)
}
