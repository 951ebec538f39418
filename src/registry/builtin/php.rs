use crate::check::{Check, CheckDescriptor, CheckResult, Kind};
use crate::context::AnalysisContext;
use crate::error::Result;
use crate::registry::Registry;

use super::{BuiltinCheck, name_has_prefix};

const PHP_GUIDELINES: &str = "https://docs.fedoraproject.org/en-US/packaging-guidelines/PHP/";

/// Checks for `php-` prefixed packages.
pub struct PhpRegistry;

impl Registry for PhpRegistry {
    fn group(&self) -> &str {
        "PHP"
    }

    fn is_applicable(&self, ctx: &AnalysisContext) -> bool {
        name_has_prefix(ctx, "php-")
    }

    fn checks(&self) -> Vec<Box<dyn Check>> {
        vec![Box::new(BuiltinCheck::new(
            CheckDescriptor::new(
                "CheckPhpRequires",
                "PHP",
                Kind::Must,
                "Package depends on the PHP runtime",
            )
            .with_url(PHP_GUIDELINES),
            check_php_requires,
        ))]
    }
}

fn check_php_requires(desc: &CheckDescriptor, ctx: &AnalysisContext) -> Result<CheckResult> {
    let spec = ctx.spec();
    let mentions_php = spec
        .requires()
        .iter()
        .chain(spec.build_requires().iter())
        .any(|r| r == "php" || r.starts_with("php-") || r.starts_with("php("));
    if mentions_php {
        Ok(CheckResult::pass(&desc.name))
    } else {
        Ok(CheckResult::fail(
            &desc.name,
            "neither Requires nor BuildRequires mention php",
        ))
    }
}
