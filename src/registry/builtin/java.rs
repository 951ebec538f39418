use crate::check::{Check, CheckDescriptor, CheckResult, Kind, Outcome};
use crate::context::AnalysisContext;
use crate::error::Result;
use crate::registry::Registry;

use super::{BuiltinCheck, name_has_prefix, rpms_have};

const JAVA_GUIDELINES: &str = "https://docs.fedoraproject.org/en-US/packaging-guidelines/Java/";

/// Checks for packages shipping jar files.
pub struct JavaRegistry;

impl Registry for JavaRegistry {
    fn group(&self) -> &str {
        "Java"
    }

    fn is_applicable(&self, ctx: &AnalysisContext) -> bool {
        name_has_prefix(ctx, "java-") || rpms_have(ctx, r"\.jar$")
    }

    fn checks(&self) -> Vec<Box<dyn Check>> {
        vec![
            Box::new(BuiltinCheck::new(
                CheckDescriptor::new(
                    "CheckJavaJarLocation",
                    "Java",
                    Kind::Must,
                    "Jar files are installed under /usr/share/java",
                )
                .with_url(JAVA_GUIDELINES),
                check_jar_location,
            )),
            Box::new(BuiltinCheck::new(
                CheckDescriptor::new(
                    "CheckJavadoc",
                    "Java",
                    Kind::Should,
                    "Javadoc documentation is shipped in a -javadoc subpackage",
                )
                .with_url(JAVA_GUIDELINES),
                check_javadoc,
            )),
        ]
    }
}

fn check_jar_location(desc: &CheckDescriptor, ctx: &AnalysisContext) -> Result<CheckResult> {
    let hits = ctx.rpms()?.files_matching(r"\.jar$")?;
    let misplaced: Vec<String> = hits
        .values()
        .flatten()
        .filter(|p| !p.starts_with("/usr/share/java") && !p.starts_with("/usr/lib/java"))
        .map(|p| p.to_string_lossy().to_string())
        .collect();
    if misplaced.is_empty() {
        Ok(CheckResult::pass(&desc.name))
    } else {
        Ok(CheckResult::fail(
            &desc.name,
            &format!("jars outside the java directories: {}", misplaced.join(", ")),
        ))
    }
}

fn check_javadoc(desc: &CheckDescriptor, ctx: &AnalysisContext) -> Result<CheckResult> {
    if ctx
        .rpms()?
        .subpackages()
        .iter()
        .any(|sub| sub.ends_with("-javadoc"))
    {
        Ok(CheckResult::pass(&desc.name))
    } else {
        Ok(CheckResult::new(&desc.name, Outcome::Pending)
            .with_message("no -javadoc subpackage found"))
    }
}
