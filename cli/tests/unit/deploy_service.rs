//! Tests for the `deploy` application service: version resolution, setup
//! loading, provisioning, package synchronisation, and activation.

#![allow(clippy::expect_used)]

use std::path::Path;

use edgeship_cli::application::ports::ProgressReporter;
use edgeship_cli::application::services::deploy::{
    DeployOptions, DeployOutcome, DeployStatus, deploy,
};
use edgeship_cli::domain::{
    ConfigError, DeployError, Manifest, ResolutionError, VersionSelector,
};

use crate::fakes::{
    FakePackages, FakePlatform, MemoryIdStore, NEW_SERVICE_ID, RecordingReporter,
    ScriptedPrompter, bare_manifest, manifest,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn opts<'a, R: ProgressReporter>(reporter: &'a R, manifest: &'a Manifest) -> DeployOptions<'a, R> {
    DeployOptions {
        reporter,
        manifest,
        service_id: None,
        version: None,
        package_path: None,
        accept_defaults: true,
        comment: None,
    }
}

async fn run(
    api: &FakePlatform,
    store: &MemoryIdStore,
    prompter: &ScriptedPrompter,
    opts: DeployOptions<'_, RecordingReporter>,
) -> Result<DeployOutcome, DeployError> {
    deploy(api, store, &FakePackages::new(), prompter, opts).await
}

/// Existing service `123` with a domain and a backend already configured.
fn configured_service() -> FakePlatform {
    FakePlatform::new()
        .with_standard_versions()
        .with_domains(&["app.example.com"])
        .with_backends(&["origin"])
}

const TWO_BACKENDS: &str = r#"
name = "app"

[setup]
  [[setup.backends]]
  name = "backend_name"
  prompt = "Backend 1"
  address = "developer.example.com"
  port = 443

  [[setup.backends]]
  address = "httpbin.org"
"#;

// ── Existing service ──────────────────────────────────────────────────────────

#[tokio::test]
async fn existing_service_latest_draft_uploads_and_activates() {
    let api = configured_service().with_package_hash("different");
    let store = MemoryIdStore::new();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();

    let outcome = run(
        &api,
        &store,
        &ScriptedPrompter::silent(),
        DeployOptions {
            service_id: Some("123"),
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");

    assert_eq!(
        api.ops(),
        [
            "list_versions",
            "list_domains",
            "list_backends",
            "get_package_metadata",
            "upload_package",
            "activate_version",
        ]
    );
    assert_eq!(api.calls_to("activate_version"), ["activate_version 123 3"]);
    assert_eq!(outcome.service_id, "123");
    assert_eq!(outcome.version, 3);
    assert_eq!(outcome.status, DeployStatus::Activated);
    assert_eq!(outcome.domain.as_deref(), Some("app.example.com"));
    assert!(!outcome.new_service);
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn identical_package_on_draft_skips_upload_and_activation() {
    let api = configured_service().with_identical_package();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();

    let outcome = run(
        &api,
        &MemoryIdStore::new(),
        &ScriptedPrompter::silent(),
        DeployOptions {
            service_id: Some("123"),
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");

    assert_eq!(outcome.status, DeployStatus::Skipped);
    assert!(api.calls_to("upload_package").is_empty());
    assert!(api.calls_to("activate_version").is_empty());
    assert!(
        reporter
            .steps()
            .iter()
            .any(|s| s.starts_with("Skipping package deployment")),
        "steps: {:?}",
        reporter.steps()
    );
}

#[tokio::test]
async fn identical_package_after_clone_still_activates() {
    let api = configured_service().with_identical_package();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();

    let outcome = run(
        &api,
        &MemoryIdStore::new(),
        &ScriptedPrompter::silent(),
        DeployOptions {
            service_id: Some("123"),
            version: Some(VersionSelector::Active),
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");

    assert_eq!(api.calls_to("clone_version"), ["clone_version 123 1"]);
    assert!(api.calls_to("upload_package").is_empty());
    assert_eq!(api.calls_to("activate_version"), ["activate_version 123 4"]);
    assert_eq!(outcome.version, 4);
    assert_eq!(outcome.status, DeployStatus::Activated);
}

#[tokio::test]
async fn locked_version_is_cloned_and_commented() {
    let api = configured_service();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();

    let outcome = run(
        &api,
        &MemoryIdStore::new(),
        &ScriptedPrompter::silent(),
        DeployOptions {
            service_id: Some("123"),
            version: Some(VersionSelector::Number(2)),
            comment: Some("release 42"),
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");

    assert_eq!(api.calls_to("clone_version"), ["clone_version 123 2"]);
    assert_eq!(
        api.calls_to("update_version_comment"),
        ["update_version_comment 123 4 release 42"]
    );
    assert_eq!(outcome.version, 4);
}

#[tokio::test]
async fn comment_failure_is_only_a_warning() {
    let api = configured_service().failing("update_version_comment");
    let reporter = RecordingReporter::new();
    let m = bare_manifest();

    let outcome = run(
        &api,
        &MemoryIdStore::new(),
        &ScriptedPrompter::silent(),
        DeployOptions {
            service_id: Some("123"),
            version: Some(VersionSelector::Active),
            comment: Some("hotfix"),
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");

    assert_eq!(outcome.status, DeployStatus::Activated);
    assert_eq!(reporter.warnings().len(), 1);
    assert!(reporter.warnings()[0].contains("could not set comment on version 4"));
}

#[tokio::test]
async fn comment_is_ignored_without_clone() {
    let api = configured_service();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();

    run(
        &api,
        &MemoryIdStore::new(),
        &ScriptedPrompter::silent(),
        DeployOptions {
            service_id: Some("123"),
            comment: Some("unused"),
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");

    assert!(api.calls_to("update_version_comment").is_empty());
    assert!(api.calls_to("clone_version").is_empty());
}

#[tokio::test]
async fn missing_version_number_fails_without_mutation() {
    let api = configured_service();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();

    let err = run(
        &api,
        &MemoryIdStore::new(),
        &ScriptedPrompter::silent(),
        DeployOptions {
            service_id: Some("123"),
            version: Some(VersionSelector::Number(9)),
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect_err("version 9 does not exist");

    assert!(matches!(
        err,
        DeployError::Resolution(ResolutionError::VersionNotFound(9))
    ));
    assert!(err.rollback().is_none());
    assert_eq!(api.mutation_count(), 0);
}

#[tokio::test]
async fn active_selector_without_active_version_fails() {
    let api = FakePlatform::new().with_versions(vec![
        crate::fakes::version(1, false, true),
        crate::fakes::version(2, false, false),
    ]);
    let reporter = RecordingReporter::new();
    let m = bare_manifest();

    let err = run(
        &api,
        &MemoryIdStore::new(),
        &ScriptedPrompter::silent(),
        DeployOptions {
            service_id: Some("123"),
            version: Some(VersionSelector::Active),
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect_err("no active version");

    assert!(matches!(
        err,
        DeployError::Resolution(ResolutionError::NoActiveVersion(_))
    ));
    assert_eq!(err.code(), "resolution_error");
}

#[tokio::test]
async fn list_versions_failure_is_wrapped() {
    let api = configured_service().failing("list_versions");
    let reporter = RecordingReporter::new();
    let m = bare_manifest();

    let err = run(
        &api,
        &MemoryIdStore::new(),
        &ScriptedPrompter::silent(),
        DeployOptions {
            service_id: Some("123"),
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect_err("listing fails");

    assert!(
        err.to_string().starts_with("error listing service versions"),
        "got: {err}"
    );
}

#[tokio::test]
async fn version_selector_without_service_id_makes_no_calls() {
    let api = FakePlatform::new();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();

    let err = run(
        &api,
        &MemoryIdStore::new(),
        &ScriptedPrompter::silent(),
        DeployOptions {
            version: Some(VersionSelector::Latest),
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect_err("service id required");

    assert!(matches!(
        err,
        DeployError::Resolution(ResolutionError::ServiceIdRequired)
    ));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn manifest_service_id_is_used_and_flag_overrides_it() {
    let reporter = RecordingReporter::new();
    let m = manifest("name = \"app\"\nservice_id = \"from-manifest\"\n");

    let api = configured_service();
    run(&api, &MemoryIdStore::new(), &ScriptedPrompter::silent(), opts(&reporter, &m))
        .await
        .expect("deploy succeeds");
    assert_eq!(api.calls_to("list_versions"), ["list_versions from-manifest"]);

    let api = configured_service();
    run(
        &api,
        &MemoryIdStore::new(),
        &ScriptedPrompter::silent(),
        DeployOptions {
            service_id: Some("from-flag"),
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");
    assert_eq!(api.calls_to("list_versions"), ["list_versions from-flag"]);
}

// ── Existing service setup ────────────────────────────────────────────────────

#[tokio::test]
async fn existing_backends_suppress_prompting() {
    let api = configured_service();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();
    let prompter = ScriptedPrompter::silent();

    run(
        &api,
        &MemoryIdStore::new(),
        &prompter,
        DeployOptions {
            service_id: Some("123"),
            accept_defaults: false,
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");

    assert!(prompter.prompts().is_empty());
    assert!(api.calls_to("create_backend").is_empty());
    assert!(api.calls_to("create_domain").is_empty());
}

#[tokio::test]
async fn existing_service_creates_only_missing_declared_backends() {
    let api = FakePlatform::new()
        .with_standard_versions()
        .with_domains(&["app.example.com"])
        .with_backends(&["backend_name"]);
    let reporter = RecordingReporter::new();
    let m = manifest(TWO_BACKENDS);

    run(
        &api,
        &MemoryIdStore::new(),
        &ScriptedPrompter::silent(),
        DeployOptions {
            service_id: Some("123"),
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");

    assert_eq!(
        api.calls_to("create_backend"),
        ["create_backend 123 3 httpbin_org httpbin.org:80"]
    );
}

#[tokio::test]
async fn existing_service_without_domain_gets_generated_one() {
    let api = FakePlatform::new()
        .with_standard_versions()
        .with_backends(&["origin"]);
    let reporter = RecordingReporter::new();
    let m = bare_manifest();
    let prompter = ScriptedPrompter::silent();

    let outcome = run(
        &api,
        &MemoryIdStore::new(),
        &prompter,
        DeployOptions {
            service_id: Some("123"),
            accept_defaults: false,
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");

    let created = api.calls_to("create_domain");
    assert_eq!(created.len(), 1);
    assert!(created[0].ends_with(".edgeship.app"), "got: {created:?}");
    assert!(prompter.prompts().is_empty());
    assert!(outcome.domain.is_some_and(|d| d.ends_with(".edgeship.app")));
}

#[tokio::test]
async fn existing_service_without_backends_prompts_for_several() {
    let api = FakePlatform::new()
        .with_standard_versions()
        .with_domains(&["app.example.com"]);
    let reporter = RecordingReporter::verbose_mode();
    let m = bare_manifest();
    // Two backends, keeping the suggested names, then stop.
    let prompter = ScriptedPrompter::new(&[
        "fastly.com",
        "443",
        "",
        "google.com",
        "123",
        "",
        "",
    ]);

    let outcome = run(
        &api,
        &MemoryIdStore::new(),
        &prompter,
        DeployOptions {
            service_id: Some("123"),
            accept_defaults: false,
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");

    assert_eq!(
        api.calls_to("create_backend"),
        [
            "create_backend 123 3 fastly_com fastly.com:443",
            "create_backend 123 3 google_com google.com:123",
        ]
    );
    assert!(api.calls_to("create_domain").is_empty());
    assert_eq!(prompter.remaining(), 0);
    assert!(!prompter.asked().iter().any(|(label, _)| label == "Domain"));
    let steps = reporter.steps();
    for expected in [
        "Creating backend 'fastly.com' (port: 443, name: fastly_com)...",
        "Creating backend 'google.com' (port: 123, name: google_com)...",
    ] {
        assert!(steps.contains(&expected.to_string()), "got: {steps:?}");
    }
    assert_eq!(outcome.version, 3);
    assert_eq!(outcome.backends_created, ["fastly_com", "google_com"]);
}

// ── New service ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn new_service_with_defaults_gets_one_originless_backend() {
    let api = FakePlatform::new();
    let store = MemoryIdStore::new();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();

    let outcome = run(&api, &store, &ScriptedPrompter::silent(), opts(&reporter, &m))
        .await
        .expect("deploy succeeds");

    assert_eq!(
        api.ops(),
        [
            "create_service",
            "create_domain",
            "create_backend",
            "get_package_metadata",
            "upload_package",
            "activate_version",
        ]
    );
    assert_eq!(api.calls_to("create_service"), ["create_service app"]);
    assert_eq!(
        api.calls_to("create_backend"),
        ["create_backend 12345 1 originless 127.0.0.1:80"]
    );
    assert_eq!(store.writes(), [Some(NEW_SERVICE_ID.to_string())]);
    assert!(
        reporter
            .steps()
            .contains(&"Setting service ID in manifest to \"12345\"...".to_string())
    );
    assert!(outcome.new_service);
    assert_eq!(outcome.version, 1);
    assert_eq!(outcome.backends_created, ["originless"]);
}

#[tokio::test]
async fn new_service_interactive_backend_prompt() {
    let api = FakePlatform::new();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();
    // domain (accept generated), address, port, name, then stop.
    let prompter = ScriptedPrompter::new(&["", "fastly.com", "443", "my_backend", ""]);

    run(
        &api,
        &MemoryIdStore::new(),
        &prompter,
        DeployOptions {
            accept_defaults: false,
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");

    assert_eq!(
        api.calls_to("create_backend"),
        ["create_backend 12345 1 my_backend fastly.com:443"]
    );
    assert_eq!(prompter.remaining(), 0);
    let asked = prompter.asked();
    assert_eq!(asked[0].0, "Domain");
    assert!(asked[0].1.as_deref().is_some_and(|d| d.ends_with(".edgeship.app")));
    assert_eq!(asked[2], ("Backend port number".to_string(), Some("80".to_string())));
    assert_eq!(asked[3], ("Backend name".to_string(), Some("fastly_com".to_string())));
}

#[tokio::test]
async fn interactive_domain_answer_is_used() {
    let api = FakePlatform::new();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();
    let prompter = ScriptedPrompter::new(&["shop.example.com", "originless", ""]);

    let outcome = run(
        &api,
        &MemoryIdStore::new(),
        &prompter,
        DeployOptions {
            accept_defaults: false,
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");

    assert_eq!(
        api.calls_to("create_domain"),
        ["create_domain 12345 1 shop.example.com"]
    );
    assert_eq!(outcome.domain.as_deref(), Some("shop.example.com"));
}

#[tokio::test]
async fn originless_keyword_yields_placeholder_backend() {
    let api = FakePlatform::new();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();
    let prompter = ScriptedPrompter::new(&["", "originless", ""]);

    run(
        &api,
        &MemoryIdStore::new(),
        &prompter,
        DeployOptions {
            accept_defaults: false,
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");

    assert_eq!(
        api.calls_to("create_backend"),
        ["create_backend 12345 1 originless 127.0.0.1:80"]
    );
}

#[tokio::test]
async fn invalid_port_is_asked_again() {
    let api = FakePlatform::new();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();
    let prompter = ScriptedPrompter::new(&["", "fastly.com", "http", "8080", "", ""]);

    run(
        &api,
        &MemoryIdStore::new(),
        &prompter,
        DeployOptions {
            accept_defaults: false,
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");

    assert_eq!(
        api.calls_to("create_backend"),
        ["create_backend 12345 1 fastly_com fastly.com:8080"]
    );
    assert_eq!(reporter.warnings(), ["invalid port number 'http'"]);
}

#[tokio::test]
async fn repeated_invalid_ports_fail_before_any_remote_call() {
    let api = FakePlatform::new();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();
    let prompter = ScriptedPrompter::new(&["", "fastly.com", "0", "70000", "x"]);

    let err = run(
        &api,
        &MemoryIdStore::new(),
        &prompter,
        DeployOptions {
            accept_defaults: false,
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect_err("no valid port");

    assert!(matches!(
        err,
        DeployError::Configuration(ConfigError::InvalidPort(_))
    ));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn no_interactive_backend_fails_without_remote_calls() {
    let api = FakePlatform::new();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();
    let prompter = ScriptedPrompter::new(&["", ""]);

    let err = run(
        &api,
        &MemoryIdStore::new(),
        &prompter,
        DeployOptions {
            accept_defaults: false,
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect_err("no backend given");

    assert!(matches!(
        err,
        DeployError::Configuration(ConfigError::NoBackendConfigured)
    ));
    assert_eq!(err.to_string(), "error configuring a backend (no input given)");
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn declared_backends_are_created_in_order_without_prompts() {
    let api = FakePlatform::new();
    let reporter = RecordingReporter::new();
    let m = manifest(TWO_BACKENDS);

    run(&api, &MemoryIdStore::new(), &ScriptedPrompter::silent(), opts(&reporter, &m))
        .await
        .expect("deploy succeeds");

    assert_eq!(
        api.calls_to("create_backend"),
        [
            "create_backend 12345 1 backend_name developer.example.com:443",
            "create_backend 12345 1 httpbin_org httpbin.org:80",
        ]
    );
}

#[tokio::test]
async fn declared_backends_are_confirmed_interactively() {
    let api = FakePlatform::new();
    let reporter = RecordingReporter::new();
    let m = manifest(TWO_BACKENDS);
    // domain, keep entry 1 as declared, override entry 2 address and port.
    let prompter = ScriptedPrompter::new(&["", "", "", "other.example", "8443"]);

    run(
        &api,
        &MemoryIdStore::new(),
        &prompter,
        DeployOptions {
            accept_defaults: false,
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");

    assert_eq!(
        prompter.prompts(),
        [
            "Domain",
            "Backend 1",
            "Backend port number",
            "Origin server for 'httpbin_org'",
            "Backend port number",
        ]
    );
    assert_eq!(
        api.calls_to("create_backend"),
        [
            "create_backend 12345 1 backend_name developer.example.com:443",
            "create_backend 12345 1 httpbin_org other.example:8443",
        ]
    );
}

#[tokio::test]
async fn declared_domain_is_used_verbatim() {
    let api = FakePlatform::new();
    let reporter = RecordingReporter::new();
    let m = manifest("name = \"app\"\n[setup]\ndomain = \"www.example.org\"\n");
    let prompter = ScriptedPrompter::new(&["originless", ""]);

    run(
        &api,
        &MemoryIdStore::new(),
        &prompter,
        DeployOptions {
            accept_defaults: false,
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");

    assert_eq!(
        api.calls_to("create_domain"),
        ["create_domain 12345 1 www.example.org"]
    );
    assert!(!prompter.prompts().contains(&"Domain".to_string()));
}

#[tokio::test]
async fn verbose_backend_step_names_port_and_name() {
    let api = FakePlatform::new();
    let reporter = RecordingReporter::verbose_mode();
    let m = manifest(TWO_BACKENDS);

    run(&api, &MemoryIdStore::new(), &ScriptedPrompter::silent(), opts(&reporter, &m))
        .await
        .expect("deploy succeeds");

    assert!(reporter.steps().contains(
        &"Creating backend 'developer.example.com' (port: 443, name: backend_name)...".to_string()
    ));
}

#[tokio::test]
async fn quiet_backend_step_names_address_only() {
    let api = FakePlatform::new();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();

    run(&api, &MemoryIdStore::new(), &ScriptedPrompter::silent(), opts(&reporter, &m))
        .await
        .expect("deploy succeeds");

    assert!(
        reporter
            .steps()
            .contains(&"Creating backend '127.0.0.1'...".to_string())
    );
}

// ── Package ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn invalid_package_fails_before_any_remote_call() {
    let api = FakePlatform::new();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();

    let err = deploy(
        &api,
        &MemoryIdStore::new(),
        &FakePackages::missing(),
        &ScriptedPrompter::silent(),
        opts(&reporter, &m),
    )
    .await
    .expect_err("package missing");

    assert!(matches!(
        err,
        DeployError::Configuration(ConfigError::InvalidPackage(_))
    ));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn package_path_defaults_to_pkg_dir() {
    let api = FakePlatform::new();
    let reporter = RecordingReporter::new();
    let m = bare_manifest();
    let packages = FakePackages::new();

    deploy(&api, &MemoryIdStore::new(), &packages, &ScriptedPrompter::silent(), opts(&reporter, &m))
        .await
        .expect("deploy succeeds");
    deploy(
        &api,
        &MemoryIdStore::new(),
        &packages,
        &ScriptedPrompter::silent(),
        DeployOptions {
            package_path: Some(Path::new("dist/custom.tar.gz")),
            ..opts(&reporter, &m)
        },
    )
    .await
    .expect("deploy succeeds");

    assert_eq!(
        packages.loaded(),
        [Path::new("pkg/app.tar.gz"), Path::new("dist/custom.tar.gz")]
    );
}
