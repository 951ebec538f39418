use crate::check::{Check, CheckDescriptor, CheckResult, Kind};
use crate::context::AnalysisContext;
use crate::error::Result;
use crate::registry::Registry;

use super::{BuiltinCheck, name_has_prefix};

const HASKELL_GUIDELINES: &str =
    "https://docs.fedoraproject.org/en-US/packaging-guidelines/Haskell/";

/// Checks for `ghc-` prefixed packages.
pub struct HaskellRegistry;

impl Registry for HaskellRegistry {
    fn group(&self) -> &str {
        "Haskell"
    }

    fn is_applicable(&self, ctx: &AnalysisContext) -> bool {
        name_has_prefix(ctx, "ghc-")
    }

    fn checks(&self) -> Vec<Box<dyn Check>> {
        vec![Box::new(BuiltinCheck::new(
            CheckDescriptor::new(
                "HaskellCheckStaticLibs",
                "Haskell",
                Kind::Must,
                "Static Haskell libraries live in the devel subpackage",
            )
            .with_url(HASKELL_GUIDELINES)
            .deprecating(&["CheckStaticLibs"]),
            check_static_libs,
        ))]
    }
}

/// GHC links statically by default, so `.a` files are expected; they just
/// have to stay out of the runtime subpackages.
fn check_static_libs(desc: &CheckDescriptor, ctx: &AnalysisContext) -> Result<CheckResult> {
    let hits = ctx.rpms()?.files_matching(r"\.a$")?;
    let misplaced: Vec<String> = hits
        .keys()
        .filter(|sub| !sub.ends_with("-devel") && !sub.ends_with("-static"))
        .cloned()
        .collect();
    if misplaced.is_empty() {
        Ok(CheckResult::pass(&desc.name))
    } else {
        Ok(CheckResult::fail(
            &desc.name,
            &format!(
                "static libraries outside devel subpackages: {}",
                misplaced.join(", ")
            ),
        ))
    }
}
