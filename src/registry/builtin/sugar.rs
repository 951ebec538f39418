use crate::check::{Check, CheckDescriptor, CheckResult, Kind};
use crate::context::AnalysisContext;
use crate::error::Result;
use crate::registry::Registry;

use super::{BuiltinCheck, name_has_prefix, rpms_have};

const SUGAR_GUIDELINES: &str =
    "https://docs.fedoraproject.org/en-US/packaging-guidelines/SugarActivityGuidelines/";

const ACTIVITY_DIR: &str = r"/usr/(share|lib|lib64)/sugar/activities/";

/// Checks for Sugar learning-platform activities, recognized by their
/// install location rather than a name prefix alone.
pub struct SugarRegistry;

impl Registry for SugarRegistry {
    fn group(&self) -> &str {
        "SugarActivity"
    }

    fn is_applicable(&self, ctx: &AnalysisContext) -> bool {
        name_has_prefix(ctx, "sugar-") || rpms_have(ctx, ACTIVITY_DIR)
    }

    fn checks(&self) -> Vec<Box<dyn Check>> {
        vec![Box::new(BuiltinCheck::new(
            CheckDescriptor::new(
                "CheckSugarActivityInfo",
                "SugarActivity",
                Kind::Must,
                "Activity ships an activity.info manifest",
            )
            .with_url(SUGAR_GUIDELINES),
            check_activity_info,
        ))]
    }
}

fn check_activity_info(desc: &CheckDescriptor, ctx: &AnalysisContext) -> Result<CheckResult> {
    let pattern = format!("{ACTIVITY_DIR}[^/]+/activity/activity\\.info$");
    if ctx.rpms()?.files_matching(&pattern)?.is_empty() {
        Ok(CheckResult::fail(
            &desc.name,
            "no activity/activity.info under the sugar activities directory",
        ))
    } else {
        Ok(CheckResult::pass(&desc.name))
    }
}
