use std::panic::{AssertUnwindSafe, catch_unwind};

use indexmap::IndexMap;
use log::{debug, error};

use crate::check::{Check, CheckDescriptor, CheckResult, Outcome};
use crate::context::AnalysisContext;
use crate::error::ReviewError;
use crate::selection::SelectionPlan;

/// One executed check: its descriptor, what it produced, and whether the
/// result is internal-only (ran as a prerequisite of a selected check
/// without being selected itself).
#[derive(Debug, Clone)]
pub struct RecordedResult {
    pub descriptor: CheckDescriptor,
    pub result: CheckResult,
    pub internal: bool,
}

/// Walk the execution plan in order and invoke each check against the
/// shared context.
///
/// Per check: the applicability gate emits nothing; a failed hard
/// prerequisite short-circuits to `not_applicable`; manual checks record
/// without running; everything a `run` raises is contained as an `error`
/// outcome for that check alone. The run is never aborted by a check.
pub fn execute(
    plan: &[CheckDescriptor],
    selection: &SelectionPlan,
    checks: &IndexMap<String, Box<dyn Check>>,
    ctx: &AnalysisContext,
) -> Vec<RecordedResult> {
    let mut recorded: Vec<RecordedResult> = Vec::new();

    for desc in plan {
        if !selection.run.contains(&desc.name) {
            continue;
        }
        let Some(check) = checks.get(&desc.name) else {
            // Plan and check map are built from the same registries.
            debug!("no check object for planned descriptor {}", desc.name);
            continue;
        };

        if !check.applicable(ctx) {
            debug!("{} not applicable, no result", desc.name);
            continue;
        }

        let result = if let Some(broken) = failed_prerequisite(desc, &recorded) {
            CheckResult::new(&desc.name, Outcome::NotApplicable)
                .with_message(&format!("prerequisite {broken} failed"))
        } else if desc.automatic {
            guarded_run(check.as_ref(), desc, ctx)
        } else {
            CheckResult::new(&desc.name, Outcome::Manual)
        };

        recorded.push(RecordedResult {
            descriptor: desc.clone(),
            result,
            internal: selection.is_internal_only(&desc.name),
        });
    }

    recorded
}

/// First hard prerequisite recorded as fail or error, if any.
fn failed_prerequisite(desc: &CheckDescriptor, recorded: &[RecordedResult]) -> Option<String> {
    if !desc.requires_success {
        return None;
    }
    recorded
        .iter()
        .find(|r| desc.needs.contains(&r.result.check_name) && r.result.is_failure())
        .map(|r| r.result.check_name.clone())
}

fn guarded_run(check: &dyn Check, desc: &CheckDescriptor, ctx: &AnalysisContext) -> CheckResult {
    match catch_unwind(AssertUnwindSafe(|| check.run(ctx))) {
        Ok(Ok(result)) => result,
        Ok(Err(ReviewError::BuildFailure(reason))) => {
            // Build-dependent checks fail outright when the shared build
            // failed; the build error itself heads the report.
            CheckResult::fail(&desc.name, &format!("build failed: {reason}"))
        }
        Ok(Err(e)) => {
            error!("check {} raised: {e}", desc.name);
            CheckResult::new(&desc.name, Outcome::Error).with_message(&e.to_string())
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!("check {} panicked: {message}", desc.name);
            CheckResult::new(&desc.name, Outcome::Error).with_message(&message)
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "check panicked".to_string()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
