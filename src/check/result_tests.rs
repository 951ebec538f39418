use super::*;

#[test]
fn glyphs_are_stable() {
    assert_eq!(Outcome::Pass.glyph(), "[x]");
    assert_eq!(Outcome::Fail.glyph(), "[!]");
    assert_eq!(Outcome::Pending.glyph(), "[?]");
    assert_eq!(Outcome::NotApplicable.glyph(), "[-]");
    assert_eq!(Outcome::Manual.glyph(), "[ ]");
    assert_eq!(Outcome::Error.glyph(), "[E]");
}

#[test]
fn fail_and_error_are_failures() {
    assert!(CheckResult::fail("C", "boom").is_failure());
    assert!(CheckResult::new("C", Outcome::Error).is_failure());
    assert!(!CheckResult::pass("C").is_failure());
    assert!(!CheckResult::new("C", Outcome::Manual).is_failure());
}

#[test]
fn attachments_accumulate() {
    let result = CheckResult::pass("CheckRpmlint")
        .with_attachment("rpmlint", "0 errors, 0 warnings")
        .with_attachment("build log", "done");
    assert_eq!(result.attachments.len(), 2);
    assert_eq!(result.attachments[0].title, "rpmlint");
}
