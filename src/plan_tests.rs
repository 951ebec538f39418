use super::*;
use crate::check::Kind;

fn desc(name: &str, group: &str) -> CheckDescriptor {
    CheckDescriptor::new(name, group, Kind::Must, "text")
}

fn names(plan: &[CheckDescriptor]) -> Vec<&str> {
    plan.iter().map(|d| d.name.as_str()).collect()
}

#[test]
fn plan_is_sorted_by_group_then_name_without_needs() {
    let descriptors = vec![
        desc("CheckB", "Python"),
        desc("CheckA", "Python"),
        desc("CheckZ", "Generic"),
    ];
    let plan = resolve(&descriptors).unwrap();
    assert_eq!(names(&plan), vec!["CheckZ", "CheckA", "CheckB"]);
}

#[test]
fn needs_appear_before_dependents() {
    let descriptors = vec![
        desc("CheckA", "Generic").needing(&["CheckZ"]),
        desc("CheckZ", "Python"),
    ];
    let plan = resolve(&descriptors).unwrap();
    assert_eq!(names(&plan), vec!["CheckZ", "CheckA"]);
}

#[test]
fn deprecation_removes_the_superseded_check() {
    let descriptors = vec![
        desc("CheckStaticLibs", "Generic"),
        desc("HaskellCheckStaticLibs", "Haskell").deprecating(&["CheckStaticLibs"]),
    ];
    let plan = resolve(&descriptors).unwrap();
    assert_eq!(names(&plan), vec!["HaskellCheckStaticLibs"]);
}

#[test]
fn deprecation_is_transitive_to_a_fixed_point() {
    // C deprecates B, B deprecates A. B goes away because of C; its own
    // deprecation of A no longer applies, so A survives.
    let descriptors = vec![
        desc("CheckA", "Generic"),
        desc("CheckB", "Generic").deprecating(&["CheckA"]),
        desc("CheckC", "Generic").deprecating(&["CheckB"]),
    ];
    let plan = resolve(&descriptors).unwrap();
    assert_eq!(names(&plan), vec!["CheckA", "CheckC"]);
}

#[test]
fn revived_check_reapplies_its_own_deprecations() {
    // D removes C, which retracts C's deprecation of B. B survives, so
    // B's deprecation of A applies after all.
    let descriptors = vec![
        desc("CheckA", "Generic"),
        desc("CheckB", "Generic").deprecating(&["CheckA"]),
        desc("CheckC", "Generic").deprecating(&["CheckB"]),
        desc("CheckD", "Generic").deprecating(&["CheckC"]),
    ];
    let plan = resolve(&descriptors).unwrap();
    assert_eq!(names(&plan), vec!["CheckB", "CheckD"]);
}

#[test]
fn mutual_deprecation_terminates_and_drops_both() {
    let descriptors = vec![
        desc("CheckA", "Generic").deprecating(&["CheckB"]),
        desc("CheckB", "Generic").deprecating(&["CheckA"]),
        desc("CheckC", "Generic"),
    ];
    let plan = resolve(&descriptors).unwrap();
    assert_eq!(names(&plan), vec!["CheckC"]);
}

#[test]
fn needs_on_a_deprecated_check_is_unresolved() {
    let descriptors = vec![
        desc("CheckOld", "Generic"),
        desc("CheckNew", "Generic").deprecating(&["CheckOld"]),
        desc("CheckUser", "Generic").needing(&["CheckOld"]),
    ];
    let err = resolve(&descriptors).unwrap_err();
    match err {
        ReviewError::UnresolvedDependency { check, missing } => {
            assert_eq!(check, "CheckUser");
            assert_eq!(missing, "CheckOld");
        }
        other => panic!("expected UnresolvedDependency, got {other:?}"),
    }
}

#[test]
fn unknown_need_is_unresolved() {
    let descriptors = vec![desc("CheckA", "Generic").needing(&["CheckMissing"])];
    let err = resolve(&descriptors).unwrap_err();
    assert!(matches!(err, ReviewError::UnresolvedDependency { .. }));
}

#[test]
fn two_check_cycle_is_fatal_and_names_both() {
    let descriptors = vec![
        desc("CheckA", "Generic").needing(&["CheckB"]),
        desc("CheckB", "Generic").needing(&["CheckA"]),
    ];
    let err = resolve(&descriptors).unwrap_err();
    match err {
        ReviewError::CyclicDependency { cycle } => {
            assert!(cycle.contains("CheckA"), "cycle was: {cycle}");
            assert!(cycle.contains("CheckB"), "cycle was: {cycle}");
        }
        other => panic!("expected CyclicDependency, got {other:?}"),
    }
}

#[test]
fn plan_is_deterministic_across_input_orderings() {
    let forward = vec![
        desc("CheckA", "Generic"),
        desc("CheckB", "Java").needing(&["CheckA"]),
        desc("CheckC", "Generic").needing(&["CheckA"]),
        desc("CheckD", "Java"),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();

    let plan_a = resolve(&forward).unwrap();
    let plan_b = resolve(&reversed).unwrap();
    assert_eq!(names(&plan_a), names(&plan_b));
    assert_eq!(names(&plan_a), vec!["CheckA", "CheckC", "CheckB", "CheckD"]);
}

#[test]
fn deprecating_an_absent_name_is_harmless() {
    let descriptors = vec![desc("CheckNew", "Haskell").deprecating(&["CheckFromFilteredGroup"])];
    let plan = resolve(&descriptors).unwrap();
    assert_eq!(names(&plan), vec!["CheckNew"]);
}
