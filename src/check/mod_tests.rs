use std::path::{Path, PathBuf};

use super::*;
use crate::build::{BuildCoordinator, BuildProducts, StaticBuilder};
use crate::context::{SpecFile, Srpm};

struct LicenseTagCheck {
    descriptor: CheckDescriptor,
}

impl Check for LicenseTagCheck {
    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn run(&self, ctx: &AnalysisContext) -> Result<CheckResult> {
        if ctx.spec().find_tag("License").is_empty() {
            Ok(CheckResult::fail(&self.descriptor.name, "no License tag"))
        } else {
            Ok(CheckResult::pass(&self.descriptor.name))
        }
    }
}

fn ctx(spec_text: &str) -> AnalysisContext {
    let spec = SpecFile::from_text(Path::new("foo.spec"), spec_text).unwrap();
    let srpm = Srpm::new(PathBuf::from("foo.src.rpm"), PathBuf::from("/tmp/none"));
    let build = BuildCoordinator::new(
        Box::new(StaticBuilder::new(BuildProducts::default())),
        PathBuf::from("foo.src.rpm"),
        PathBuf::from("/tmp/review"),
    );
    AnalysisContext::new(spec, srpm, build, Vec::new(), PathBuf::from("/tmp/review"))
}

#[test]
fn checks_default_to_applicable() {
    let check = LicenseTagCheck {
        descriptor: CheckDescriptor::new("CheckLicenseField", "Generic", Kind::Must, "License tag"),
    };
    assert!(check.applicable(&ctx("Name: foo\n")));
}

#[test]
fn run_queries_the_shared_context() {
    let check = LicenseTagCheck {
        descriptor: CheckDescriptor::new("CheckLicenseField", "Generic", Kind::Must, "License tag"),
    };

    let result = check.run(&ctx("Name: foo\nLicense: MIT\n")).unwrap();
    assert_eq!(result.outcome, Outcome::Pass);

    let result = check.run(&ctx("Name: foo\n")).unwrap();
    assert_eq!(result.outcome, Outcome::Fail);
    assert_eq!(result.message.as_deref(), Some("no License tag"));
}
