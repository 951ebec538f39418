use regex::Regex;

use crate::check::{Check, CheckDescriptor, CheckResult, Kind};
use crate::context::AnalysisContext;
use crate::error::Result;
use crate::registry::Registry;

use super::{BuiltinCheck, name_has_prefix};

const PYTHON_GUIDELINES: &str =
    "https://docs.fedoraproject.org/en-US/packaging-guidelines/Python/";

/// Checks for `python-` prefixed packages.
pub struct PythonRegistry;

impl Registry for PythonRegistry {
    fn group(&self) -> &str {
        "Python"
    }

    fn is_applicable(&self, ctx: &AnalysisContext) -> bool {
        name_has_prefix(ctx, "python-")
    }

    fn checks(&self) -> Vec<Box<dyn Check>> {
        vec![
            Box::new(BuiltinCheck::new(
                CheckDescriptor::new(
                    "CheckPythonBuildRequires",
                    "Python",
                    Kind::Must,
                    "Package build-requires a python interpreter devel package",
                )
                .with_url(PYTHON_GUIDELINES)
                .needing(&["CheckBuildRequires"]),
                check_python_build_requires,
            )),
            Box::new(BuiltinCheck::new(
                CheckDescriptor::new(
                    "CheckPythonEggInfo",
                    "Python",
                    Kind::Should,
                    "Binary packages ship egg-info or dist-info metadata",
                )
                .with_url(PYTHON_GUIDELINES),
                check_python_egg_info,
            )),
        ]
    }
}

fn check_python_build_requires(
    desc: &CheckDescriptor,
    ctx: &AnalysisContext,
) -> Result<CheckResult> {
    let devel = Regex::new(r"^python\d*-devel$").expect("static regex");
    if ctx
        .spec()
        .build_requires()
        .iter()
        .any(|br| devel.is_match(br))
    {
        Ok(CheckResult::pass(&desc.name))
    } else {
        Ok(CheckResult::fail(
            &desc.name,
            "no pythonN-devel in BuildRequires",
        ))
    }
}

fn check_python_egg_info(desc: &CheckDescriptor, ctx: &AnalysisContext) -> Result<CheckResult> {
    if ctx.rpms()?.find(r"\.(egg-info|dist-info)")? {
        Ok(CheckResult::pass(&desc.name))
    } else {
        Ok(CheckResult::pending(
            &desc.name,
            "no egg-info or dist-info found in the built packages",
        ))
    }
}
