// tests/build_command.rs
#![cfg(unix)]

mod common;
use crate::common::{TestBundle, init_tracing, with_timeout};

use std::fs;

use bundlekit::commands::BundleContext;
use bundlekit::commands::build::{BuildOptions, build_all};
use bundlekit::commands::run::run_components;
use bundlekit::commands::svc::{SvcAction, compose_command, resolve_services};
use bundlekit::errors::BundleError;
use bundlekit::types::ComponentType;

const SHOP: &str = r#"
name = "shop"
svc = ["postgresql", "keycloak"]

[[microservices]]
name = "orders"
stack = "custom"
commands = { build = "echo built-orders", run = "echo running-orders" }

[[microservices]]
name = "catalog"
stack = "custom"
commands = { build = "echo built-catalog 1>&2", run = "exit 5" }

[[microfrontends]]
name = "shop-ui"
stack = "custom"
commands = { build = "echo built-ui", run = "true" }
"#;

fn shop() -> TestBundle {
    TestBundle::new(SHOP, &["orders", "catalog"], &["shop-ui"])
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn options() -> BuildOptions {
    BuildOptions {
        parallelism: Some(2),
        ..BuildOptions::default()
    }
}

fn execution_failure(err: BundleError) -> (String, i32) {
    match err {
        BundleError::ExecutionFailed { message, exit_code } => (message, exit_code),
        other => panic!("expected ExecutionFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn build_writes_one_log_per_component() {
    init_tracing();
    let bundle = shop();
    let ctx = bundle.context();

    with_timeout(build_all(&ctx, &[], None, options())).await.unwrap();

    assert_eq!(
        fs::read_to_string(bundle.log_file("orders")).unwrap().trim(),
        "built-orders"
    );
    assert_eq!(
        fs::read_to_string(bundle.log_file("catalog")).unwrap().trim(),
        "built-catalog"
    );
    assert!(bundle.log_file("shop-ui").exists());
}

#[tokio::test]
async fn stale_logs_are_cleared_before_a_build() {
    let bundle = shop();
    let ctx = bundle.context();
    let stale = bundle.log_file("removed-component");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "old").unwrap();

    with_timeout(build_all(&ctx, &names(&["orders"]), None, options()))
        .await
        .unwrap();

    assert!(!stale.exists());
    assert!(bundle.log_file("orders").exists());
}

#[tokio::test]
async fn kind_filter_limits_the_build() {
    let bundle = shop();
    let ctx = bundle.context();

    with_timeout(build_all(&ctx, &[], Some(ComponentType::Microfrontend), options()))
        .await
        .unwrap();

    assert!(bundle.log_file("shop-ui").exists());
    assert!(!bundle.log_file("orders").exists());
}

#[tokio::test]
async fn failing_build_reports_components_and_exit_code() {
    init_tracing();
    let toml = r#"
name = "broken"

[[microservices]]
name = "good"
stack = "custom"
commands = { build = "true", run = "true" }

[[microservices]]
name = "bad"
stack = "custom"
commands = { build = "exit 3", run = "true" }
"#;
    let bundle = TestBundle::new(toml, &["good", "bad"], &[]);
    let ctx = bundle.context();

    let err = with_timeout(build_all(&ctx, &[], None, options()))
        .await
        .unwrap_err();
    let (message, exit_code) = execution_failure(err);

    assert_eq!(exit_code, 3);
    assert!(message.starts_with("The following components failed to build:"));
    assert!(message.contains("- bad: exited with code 3"), "{message}");
    assert!(!message.contains("- good"), "{message}");
    assert!(message.ends_with("See log files for more information"));
}

#[tokio::test]
async fn streamed_build_failure_does_not_point_to_log_files() {
    let toml = r#"
name = "broken"

[[microservices]]
name = "bad"
stack = "custom"
commands = { build = "exit 4", run = "true" }
"#;
    let bundle = TestBundle::new(toml, &["bad"], &[]);
    let ctx = bundle.context();

    let opts = BuildOptions {
        stdout: true,
        ..options()
    };
    let err = with_timeout(build_all(&ctx, &[], None, opts))
        .await
        .unwrap_err();
    let (message, exit_code) = execution_failure(err);

    assert_eq!(exit_code, 4);
    assert!(message.ends_with("- bad: exited with code 4"), "{message}");
    assert!(!message.contains("See log files"), "{message}");
    assert!(!bundle.log_file("bad").exists());
}

#[tokio::test]
async fn descriptor_fail_fast_skips_remaining_components() {
    let toml = r#"
name = "broken"

[build]
parallelism = 1
fail_fast = true

[[microservices]]
name = "first"
stack = "custom"
commands = { build = "exit 1", run = "true" }

[[microservices]]
name = "second"
stack = "custom"
commands = { build = "echo never", run = "true" }
"#;
    let bundle = TestBundle::new(toml, &["first", "second"], &[]);
    let ctx = bundle.context();

    let err = with_timeout(build_all(&ctx, &[], None, BuildOptions::default()))
        .await
        .unwrap_err();
    let (message, exit_code) = execution_failure(err);

    assert_eq!(exit_code, 1);
    assert!(message.contains("- first: exited with code 1"), "{message}");
    assert!(message.contains("- second: not attempted"), "{message}");
    assert_eq!(fs::read_to_string(bundle.log_file("second")).unwrap(), "");
}

#[tokio::test]
async fn dry_run_executes_nothing() {
    let toml = r#"
name = "dry"

[[microservices]]
name = "api"
stack = "custom"
commands = { build = "touch built.marker", run = "true" }
"#;
    let bundle = TestBundle::new(toml, &["api"], &[]);
    let ctx = bundle.context();

    let opts = BuildOptions {
        dry_run: true,
        ..options()
    };
    with_timeout(build_all(&ctx, &[], None, opts)).await.unwrap();

    assert!(!bundle.path().join("microservices/api/built.marker").exists());
    assert!(!bundle.path().join(".bundlekit").exists());
}

#[tokio::test]
async fn unknown_component_is_rejected_before_building() {
    let bundle = shop();
    let ctx = bundle.context();

    let err = with_timeout(build_all(&ctx, &names(&["billing"]), None, options()))
        .await
        .unwrap_err();
    assert!(matches!(err, BundleError::ComponentNotFound(name) if name == "billing"));
}

#[tokio::test]
async fn run_requires_a_name() {
    let bundle = shop();
    let err = run_components(&bundle.context(), &[], false).await.unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert_eq!(err.to_string(), "Run failed, missing required arg name");
}

#[tokio::test]
async fn run_rejects_missing_component_directory() {
    let bundle = TestBundle::new(SHOP, &["orders"], &[]);
    let err = run_components(&bundle.context(), &names(&["orders", "shop-ui"]), false)
        .await
        .unwrap_err();
    match err {
        BundleError::ConfigError(msg) => assert!(msg.contains("does not exist"), "{msg}"),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[tokio::test]
async fn run_propagates_the_failing_exit_code() {
    init_tracing();
    let bundle = shop();
    let ctx = bundle.context();

    with_timeout(run_components(&ctx, &names(&["orders", "shop-ui"]), false))
        .await
        .unwrap();

    let err = with_timeout(run_components(&ctx, &names(&["orders", "catalog"]), false))
        .await
        .unwrap_err();
    let (message, exit_code) = execution_failure(err);
    assert_eq!(exit_code, 5);
    assert!(message.contains("The following components failed to run:"));
    assert!(message.contains("- catalog: exited with code 5"), "{message}");
}

#[test]
fn missing_bundle_descriptor_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = BundleContext::load(dir.path()).unwrap_err();
    assert!(matches!(err, BundleError::ConfigError(_)));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn services_must_be_named_or_all() {
    let bundle = shop();
    let ctx = bundle.context();

    let err = resolve_services(&ctx, SvcAction::Start, &[], false).unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("use `--all` flag to start"));

    let err = resolve_services(&ctx, SvcAction::Stop, &names(&["redis"]), false).unwrap_err();
    assert_eq!(err.to_string(), "Service redis is not enabled.");

    let all = resolve_services(&ctx, SvcAction::Stop, &[], true).unwrap();
    assert_eq!(all, names(&["postgresql", "keycloak"]));
}

#[test]
fn compose_command_lists_files_and_services() {
    let services = names(&["postgresql", "keycloak"]);
    assert_eq!(
        compose_command("shop", SvcAction::Start, &services),
        "docker compose -p shop -f svc/postgresql.yml -f svc/keycloak.yml up --build -d postgresql keycloak"
    );
    assert_eq!(
        compose_command("shop", SvcAction::Stop, &services[..1]),
        "docker compose -p shop -f svc/postgresql.yml stop postgresql"
    );
}
