use clap::Parser;

use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("pkg-review").chain(args.iter().copied())).unwrap()
}

#[test]
fn sources_are_mutually_exclusive() {
    let err = Cli::try_parse_from(["pkg-review", "--bug", "42", "--name", "foo"]);
    assert!(err.is_err());
}

#[test]
fn each_source_maps_to_its_variant() {
    let cli = parse(&["--bug", "42"]);
    assert_eq!(
        cli.artifact_source().unwrap(),
        Some(ArtifactSource::Bug("42".to_string()))
    );

    let cli = parse(&["--url", "https://dl.example.org/foo-1.0-1.src.rpm"]);
    assert_eq!(
        cli.artifact_source().unwrap(),
        Some(ArtifactSource::Url(
            "https://dl.example.org/foo-1.0-1.src.rpm".to_string()
        ))
    );

    let cli = parse(&["--name", "foo"]);
    assert_eq!(
        cli.artifact_source().unwrap(),
        Some(ArtifactSource::Name("foo".to_string()))
    );
}

#[test]
fn missing_source_is_a_configuration_error() {
    let err = parse(&[]).artifact_source().unwrap_err();
    assert!(matches!(err, crate::error::ReviewError::Config(_)));
    assert_eq!(err.exit_code(), crate::EXIT_CONFIG_ERROR);
}

#[test]
fn display_mode_needs_no_source() {
    let cli = parse(&["--display"]);
    assert_eq!(cli.artifact_source().unwrap(), None);
}

#[test]
fn exclude_list_splits_on_commas() {
    let cli = parse(&["--name", "foo", "-x", "CheckRpmlint,CheckStaticLibs"]);
    assert_eq!(cli.exclude, ["CheckRpmlint", "CheckStaticLibs"]);
}

#[test]
fn build_modes_are_mutually_exclusive() {
    let cli = parse(&["--name", "foo", "--cache", "--no-build"]);
    assert!(cli.artifact_source().is_err());

    let cli = parse(&["--name", "foo", "--cache"]);
    assert!(cli.artifact_source().is_ok());
}

#[test]
fn mock_options_split_on_whitespace() {
    let cli = parse(&["--name", "foo", "--mock-options", "--enable-network  --no-clean"]);
    assert_eq!(cli.mock_option_list(), ["--enable-network", "--no-clean"]);

    let cli = parse(&["--name", "foo"]);
    assert!(cli.mock_option_list().is_empty());
}
