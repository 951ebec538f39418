use crate::check::{Check, CheckDescriptor, CheckResult, Kind};
use crate::context::AnalysisContext;
use crate::error::Result;
use crate::registry::Registry;

use super::BuiltinCheck;

const GUIDELINES: &str = "https://docs.fedoraproject.org/en-US/packaging-guidelines/";

/// Checks applying to every package regardless of language.
pub struct GenericRegistry;

impl Registry for GenericRegistry {
    fn group(&self) -> &str {
        "Generic"
    }

    fn is_applicable(&self, _ctx: &AnalysisContext) -> bool {
        true
    }

    fn checks(&self) -> Vec<Box<dyn Check>> {
        vec![
            Box::new(BuiltinCheck::new(
                CheckDescriptor::new(
                    "CheckSpecName",
                    "Generic",
                    Kind::Must,
                    "Spec file name matches the package name",
                )
                .with_url(GUIDELINES),
                check_spec_name,
            )),
            Box::new(BuiltinCheck::new(
                CheckDescriptor::new(
                    "CheckLicenseField",
                    "Generic",
                    Kind::Must,
                    "License field in the spec file is a valid license identifier",
                )
                .with_url(GUIDELINES),
                check_license_field,
            )),
            Box::new(BuiltinCheck::manual(
                CheckDescriptor::new(
                    "CheckLicense",
                    "Generic",
                    Kind::Must,
                    "Package is licensed with an open-source compatible license and the \
                     License field matches the actual license of the sources",
                )
                .with_url(GUIDELINES),
            )),
            Box::new(BuiltinCheck::new(
                CheckDescriptor::new(
                    "CheckBuildRequires",
                    "Generic",
                    Kind::Must,
                    "Spec declares the build dependencies it needs",
                )
                .with_url(GUIDELINES),
                check_build_requires,
            )),
            Box::new(BuiltinCheck::new(
                CheckDescriptor::new(
                    "CheckSourceUrls",
                    "Generic",
                    Kind::Should,
                    "Source tags use full upstream URLs",
                )
                .with_url(GUIDELINES),
                check_source_urls,
            )),
            Box::new(BuiltinCheck::new(
                CheckDescriptor::new(
                    "CheckStaticLibs",
                    "Generic",
                    Kind::Must,
                    "Package contains no static libraries",
                )
                .with_url(GUIDELINES),
                check_static_libs,
            )),
            Box::new(BuiltinCheck::new(
                CheckDescriptor::new(
                    "CheckRpmlint",
                    "Generic",
                    Kind::Must,
                    "Rpmlint reports no errors on the built packages",
                )
                .with_url(GUIDELINES),
                check_rpmlint,
            )),
            Box::new(BuiltinCheck::manual(
                CheckDescriptor::new(
                    "CheckFunctionsAsDescribed",
                    "Generic",
                    Kind::Should,
                    "Package functions as described",
                )
                .with_url(GUIDELINES),
            )),
        ]
    }
}

fn check_spec_name(desc: &CheckDescriptor, ctx: &AnalysisContext) -> Result<CheckResult> {
    let name = ctx.spec().name();
    let stem = ctx
        .spec()
        .path()
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    if stem == name {
        Ok(CheckResult::pass(&desc.name))
    } else {
        Ok(CheckResult::fail(
            &desc.name,
            &format!("spec file is named '{stem}.spec' but the package is '{name}'"),
        ))
    }
}

fn check_license_field(desc: &CheckDescriptor, ctx: &AnalysisContext) -> Result<CheckResult> {
    let licenses = ctx.spec().find_tag("License");
    match licenses.first().map(String::as_str) {
        None => Ok(CheckResult::fail(&desc.name, "no License tag in the spec")),
        Some("Unknown" | "None") => Ok(CheckResult::fail(
            &desc.name,
            &format!("License tag '{}' is not a license", licenses[0]),
        )),
        Some(_) => Ok(CheckResult::pass(&desc.name)),
    }
}

fn check_build_requires(desc: &CheckDescriptor, ctx: &AnalysisContext) -> Result<CheckResult> {
    if ctx.spec().build_requires().is_empty() {
        Ok(CheckResult::fail(&desc.name, "spec declares no BuildRequires"))
    } else {
        Ok(CheckResult::pass(&desc.name))
    }
}

fn check_source_urls(desc: &CheckDescriptor, ctx: &AnalysisContext) -> Result<CheckResult> {
    let local: Vec<String> = ctx
        .spec()
        .sources()
        .into_iter()
        .filter(|s| !s.starts_with("http://") && !s.starts_with("https://") && !s.starts_with("ftp://"))
        .collect();
    if local.is_empty() {
        Ok(CheckResult::pass(&desc.name))
    } else {
        Ok(CheckResult::fail(
            &desc.name,
            &format!("sources without a full URL: {}", local.join(", ")),
        ))
    }
}

fn check_static_libs(desc: &CheckDescriptor, ctx: &AnalysisContext) -> Result<CheckResult> {
    let hits = ctx.rpms()?.files_matching(r"\.a$")?;
    if hits.is_empty() {
        Ok(CheckResult::pass(&desc.name))
    } else {
        let subpackages: Vec<String> = hits.keys().cloned().collect();
        Ok(CheckResult::fail(
            &desc.name,
            &format!("static libraries in: {}", subpackages.join(", ")),
        ))
    }
}

fn check_rpmlint(desc: &CheckDescriptor, ctx: &AnalysisContext) -> Result<CheckResult> {
    // The full output lands in the report's rpmlint table; only the
    // verdict belongs here.
    let output = ctx.rpmlint_output()?;
    let errors = output.lines().filter(|l| l.contains(" E: ")).count();
    if errors == 0 {
        Ok(CheckResult::pass(&desc.name))
    } else {
        Ok(CheckResult::fail(
            &desc.name,
            &format!("rpmlint reports {errors} error(s)"),
        ))
    }
}

#[cfg(test)]
#[path = "generic_tests.rs"]
mod tests;
