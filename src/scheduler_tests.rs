use std::path::{Path, PathBuf};

use super::*;
use crate::build::{BuildCoordinator, BuildProducts, Builder, StaticBuilder};
use crate::check::Kind;
use crate::context::{SpecFile, Srpm};
use crate::error::Result;
use crate::selection::Selection;

enum Behavior {
    Pass,
    Fail,
    RaiseError(String),
    Panic(String),
    NeedsBuild,
    NeverApplicable,
}

struct TestCheck {
    descriptor: CheckDescriptor,
    behavior: Behavior,
}

impl Check for TestCheck {
    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    fn applicable(&self, _ctx: &AnalysisContext) -> bool {
        !matches!(self.behavior, Behavior::NeverApplicable)
    }

    fn run(&self, ctx: &AnalysisContext) -> Result<CheckResult> {
        match &self.behavior {
            Behavior::Pass | Behavior::NeverApplicable => {
                Ok(CheckResult::pass(&self.descriptor.name))
            }
            Behavior::Fail => Ok(CheckResult::fail(&self.descriptor.name, "found a problem")),
            Behavior::RaiseError(msg) => Err(ReviewError::Config(msg.clone())),
            Behavior::Panic(msg) => panic!("{}", msg.clone()),
            Behavior::NeedsBuild => {
                ctx.rpms()?;
                Ok(CheckResult::pass(&self.descriptor.name))
            }
        }
    }
}

struct FailingBuilder;

impl Builder for FailingBuilder {
    fn build(&self, _srpm: &Path, _workdir: &Path) -> Result<BuildProducts> {
        Err(ReviewError::BuildFailure("mock exited with 1".to_string()))
    }
}

fn ctx(build_fails: bool) -> AnalysisContext {
    let spec = SpecFile::from_text(Path::new("foo.spec"), "Name: foo\n").unwrap();
    let srpm = Srpm::new(PathBuf::from("foo.src.rpm"), PathBuf::from("/tmp/none"));
    let builder: Box<dyn Builder> = if build_fails {
        Box::new(FailingBuilder)
    } else {
        Box::new(StaticBuilder::new(BuildProducts::default()))
    };
    let build = BuildCoordinator::new(builder, PathBuf::from("foo.src.rpm"), PathBuf::from("/tmp"));
    AnalysisContext::new(spec, srpm, build, Vec::new(), PathBuf::from("/tmp"))
}

fn harness(checks: Vec<TestCheck>) -> (Vec<CheckDescriptor>, IndexMap<String, Box<dyn Check>>) {
    let plan: Vec<CheckDescriptor> = checks.iter().map(|c| c.descriptor.clone()).collect();
    let map: IndexMap<String, Box<dyn Check>> = checks
        .into_iter()
        .map(|c| (c.descriptor.name.clone(), Box::new(c) as Box<dyn Check>))
        .collect();
    (plan, map)
}

fn run_all(checks: Vec<TestCheck>, build_fails: bool) -> Vec<RecordedResult> {
    let (plan, map) = harness(checks);
    let selection = Selection::default().apply(&plan);
    execute(&plan, &selection, &map, &ctx(build_fails))
}

fn check(name: &str, behavior: Behavior) -> TestCheck {
    TestCheck {
        descriptor: CheckDescriptor::new(name, "Generic", Kind::Must, "text"),
        behavior,
    }
}

#[test]
fn raised_error_is_contained_and_siblings_run() {
    let results = run_all(
        vec![
            check("CheckBoom", Behavior::RaiseError("boom".to_string())),
            check("CheckOk", Behavior::Pass),
        ],
        false,
    );

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].result.outcome, Outcome::Error);
    assert!(results[0].result.message.as_deref().unwrap().contains("boom"));
    assert_eq!(results[1].result.outcome, Outcome::Pass);
}

#[test]
fn panic_is_contained_with_its_message() {
    let results = run_all(
        vec![
            check("CheckPanics", Behavior::Panic("boom".to_string())),
            check("CheckOk", Behavior::Pass),
        ],
        false,
    );

    assert_eq!(results[0].result.outcome, Outcome::Error);
    assert_eq!(results[0].result.message.as_deref(), Some("boom"));
    assert_eq!(results[1].result.outcome, Outcome::Pass);
}

#[test]
fn manual_check_records_without_running() {
    // A panic behavior proves run() is never invoked.
    let mut manual = check("CheckLicense", Behavior::Panic("must not run".to_string()));
    manual.descriptor = manual.descriptor.manual();

    let results = run_all(vec![manual], false);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].result.outcome, Outcome::Manual);
}

#[test]
fn non_applicable_check_emits_no_result() {
    let results = run_all(
        vec![
            check("CheckSkipped", Behavior::NeverApplicable),
            check("CheckOk", Behavior::Pass),
        ],
        false,
    );
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].result.check_name, "CheckOk");
}

#[test]
fn failed_hard_prerequisite_gates_the_dependent() {
    let mut dependent = check("CheckDependent", Behavior::Pass);
    dependent.descriptor = dependent
        .descriptor
        .needing(&["CheckBroken"])
        .requiring_success();

    let results = run_all(vec![check("CheckBroken", Behavior::Fail), dependent], false);

    assert_eq!(results[1].result.outcome, Outcome::NotApplicable);
    assert!(
        results[1]
            .result
            .message
            .as_deref()
            .unwrap()
            .contains("CheckBroken")
    );
}

#[test]
fn soft_prerequisite_failure_does_not_gate() {
    let mut dependent = check("CheckDependent", Behavior::Pass);
    dependent.descriptor = dependent.descriptor.needing(&["CheckBroken"]);

    let results = run_all(vec![check("CheckBroken", Behavior::Fail), dependent], false);
    assert_eq!(results[1].result.outcome, Outcome::Pass);
}

#[test]
fn build_failure_maps_to_fail_with_reason() {
    let results = run_all(vec![check("CheckStaticLibs", Behavior::NeedsBuild)], true);
    assert_eq!(results[0].result.outcome, Outcome::Fail);
    assert_eq!(
        results[0].result.message.as_deref(),
        Some("build failed: mock exited with 1")
    );
}

#[test]
fn single_mode_marks_prerequisites_internal() {
    let mut selected = check("CheckSelected", Behavior::Pass);
    selected.descriptor = selected.descriptor.needing(&["CheckPrereq"]);
    let checks = vec![check("CheckPrereq", Behavior::Pass), selected];

    let (plan, map) = harness(checks);
    let selection = Selection::from_cli(Some("CheckSelected"), &[]).apply(&plan);
    let results = execute(&plan, &selection, &map, &ctx(false));

    assert_eq!(results.len(), 2);
    assert!(results[0].internal);
    assert_eq!(results[0].result.check_name, "CheckPrereq");
    assert!(!results[1].internal);
}

#[test]
fn unselected_checks_do_not_run() {
    let checks = vec![check("CheckA", Behavior::Pass), check("CheckB", Behavior::Pass)];
    let (plan, map) = harness(checks);
    let selection = Selection::from_cli(Some("CheckA"), &[]).apply(&plan);
    let results = execute(&plan, &selection, &map, &ctx(false));

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].result.check_name, "CheckA");
}
