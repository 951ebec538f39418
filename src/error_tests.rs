use super::*;

#[test]
fn config_error_exits_with_config_code() {
    let err = ReviewError::Config("bad flag combination".to_string());
    assert_eq!(err.exit_code(), crate::EXIT_CONFIG_ERROR);
}

#[test]
fn fatal_errors_exit_with_one() {
    let err = ReviewError::CyclicDependency {
        cycle: "A -> B -> A".to_string(),
    };
    assert_eq!(err.exit_code(), crate::EXIT_FATAL);

    let err = ReviewError::ArtifactNotFound {
        reference: "foo".to_string(),
    };
    assert_eq!(err.exit_code(), crate::EXIT_FATAL);
}

#[test]
fn build_failure_message_is_report_ready() {
    let err = ReviewError::BuildFailure("mock exited with status 1".to_string());
    assert_eq!(err.to_string(), "build failed: mock exited with status 1");
}

#[test]
fn cyclic_dependency_names_the_cycle() {
    let err = ReviewError::CyclicDependency {
        cycle: "CheckA -> CheckB -> CheckA".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("CheckA"));
    assert!(msg.contains("CheckB"));
}
