// tests/cli_parsing.rs

use clap::Parser;
use clap::error::ErrorKind;

use bundlekit::cli::{CliArgs, Command};
use bundlekit::types::ComponentType;

#[test]
fn build_flags_are_parsed() {
    let args = CliArgs::try_parse_from([
        "bundlekit",
        "--bundle-dir",
        "/tmp/shop",
        "build",
        "orders",
        "--ms",
        "--parallelism",
        "3",
        "--fail-fast",
    ])
    .unwrap();

    assert_eq!(args.bundle_dir.to_str(), Some("/tmp/shop"));
    let Command::Build(build) = args.command else {
        panic!("expected build command");
    };
    assert_eq!(build.names, vec!["orders"]);
    assert_eq!(build.filter.kind(), Some(ComponentType::Microservice));
    assert_eq!(build.parallelism, Some(3));
    assert!(build.fail_fast);
    assert!(!build.stdout);
}

#[test]
fn zero_parallelism_is_a_usage_error() {
    let err = CliArgs::try_parse_from(["bundlekit", "build", "--parallelism", "0"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn kind_filters_conflict() {
    let err = CliArgs::try_parse_from(["bundlekit", "list", "--ms", "--mfe"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
}

#[test]
fn global_flags_follow_the_subcommand() {
    let args = CliArgs::try_parse_from(["bundlekit", "svc", "start", "--all", "--dry-run"]).unwrap();
    assert!(args.dry_run);
    assert!(matches!(args.command, Command::Svc(_)));
}
