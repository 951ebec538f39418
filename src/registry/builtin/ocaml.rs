use crate::check::{Check, CheckDescriptor, CheckResult, Kind};
use crate::context::AnalysisContext;
use crate::error::Result;
use crate::registry::Registry;

use super::{BuiltinCheck, name_has_prefix};

const OCAML_GUIDELINES: &str =
    "https://docs.fedoraproject.org/en-US/packaging-guidelines/OCaml/";

/// Checks for `ocaml-` prefixed packages.
pub struct OcamlRegistry;

impl Registry for OcamlRegistry {
    fn group(&self) -> &str {
        "OCaml"
    }

    fn is_applicable(&self, ctx: &AnalysisContext) -> bool {
        name_has_prefix(ctx, "ocaml-")
    }

    fn checks(&self) -> Vec<Box<dyn Check>> {
        vec![Box::new(BuiltinCheck::new(
            CheckDescriptor::new(
                "CheckOcamlDevelFiles",
                "OCaml",
                Kind::Must,
                "Compile-time OCaml artifacts live in a -devel subpackage",
            )
            .with_url(OCAML_GUIDELINES),
            check_devel_files,
        ))]
    }
}

fn check_devel_files(desc: &CheckDescriptor, ctx: &AnalysisContext) -> Result<CheckResult> {
    let hits = ctx.rpms()?.files_matching(r"\.(cmxa|cmx|mli|cmti)$")?;
    let misplaced: Vec<String> = hits
        .keys()
        .filter(|sub| !sub.ends_with("-devel"))
        .cloned()
        .collect();
    if misplaced.is_empty() {
        Ok(CheckResult::pass(&desc.name))
    } else {
        Ok(CheckResult::fail(
            &desc.name,
            &format!(
                "compile-time artifacts outside -devel: {}",
                misplaced.join(", ")
            ),
        ))
    }
}
