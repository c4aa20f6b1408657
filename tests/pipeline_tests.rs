mod common;

use common::{INVALID_SPEC, MALFORMED_SPEC, RecordingRunner, ScriptedPrompter, VALID_SPEC, Workspace};
use ninaapi_release::error::{CommandError, SpecError};
use ninaapi_release::{
    DescriptorRequest, EnvConfig, FailurePolicy, ReleaseChannel, ReleaseDescriptor, ReleaseError,
    ReleasePipeline, ReleaseReport, ReleaseStep, RuntimeConfig, StepStatus,
};

const STABLE_URL: &str =
    "https://github.com/christian-photo/ninaAPI/releases/download/2.2.0.0/ninaAPI.zip";
const BETA_URL: &str =
    "https://github.com/christian-photo/ninaAPI/releases/download/2.2.0.0-b.3/ninaAPI.zip";

fn quiet() -> RuntimeConfig {
    RuntimeConfig::new(false, true)
}

fn stable(update_docs: bool) -> ReleaseDescriptor {
    ReleaseDescriptor::new("2.2.0.0", ReleaseChannel::Stable, "2.2.0.0", update_docs).unwrap()
}

fn beta() -> ReleaseDescriptor {
    ReleaseDescriptor::new(
        "2.2.0.0",
        ReleaseChannel::Beta {
            build: "3".to_string(),
        },
        "2.2.0.0-beta",
        false,
    )
    .unwrap()
}

#[tokio::test]
async fn stable_release_runs_every_step_in_order() {
    let ws = Workspace::new();
    ws.write_generated_manifest(STABLE_URL);
    let runner = RecordingRunner::new();
    let prompter = ScriptedPrompter::new(&[]);
    let config = quiet();
    let pipeline = ReleasePipeline::new(&ws.settings, &runner, &prompter, &config);

    let mut report = ReleaseReport::new();
    pipeline.build(&mut report).await.unwrap();
    let report = pipeline
        .run_with_descriptor(&stable(false), report)
        .await
        .unwrap();

    assert_eq!(
        runner.programs(),
        vec!["dotnet", "pwsh", "gh", "git", "git", "node", "git", "git", "git"]
    );
    assert!(report.is_clean());
    assert_eq!(
        report.release_url.as_deref(),
        Some("https://github.com/christian-photo/ninaAPI/releases/tag/2.2.0.0")
    );

    let package = &runner.commands_of("pwsh")[0];
    assert!(!package.has_arg("-beta"));
    assert_eq!(package.arg_after("-installerUrl"), Some(STABLE_URL));

    let publish = &runner.commands_of("gh")[0];
    assert_eq!(publish.arg_values().nth(2), Some("2.2.0.0"));
    assert!(!publish.has_arg("-p"));

    assert!(ws.registry_manifest("2.2.0.0").is_file());
    // gate after the manifest tests
    assert_eq!(prompter.pause_count(), 1);
}

#[tokio::test]
async fn beta_release_tags_prerelease() {
    let ws = Workspace::new();
    ws.write_generated_manifest(BETA_URL);
    let runner = RecordingRunner::new();
    let prompter = ScriptedPrompter::new(&[]);
    let config = quiet();
    let pipeline = ReleasePipeline::new(&ws.settings, &runner, &prompter, &config);

    pipeline
        .run_with_descriptor(&beta(), ReleaseReport::new())
        .await
        .unwrap();

    let package = &runner.commands_of("pwsh")[0];
    assert!(package.has_arg("-beta"));
    assert_eq!(package.arg_after("-installerUrl"), Some(BETA_URL));

    let publish = &runner.commands_of("gh")[0];
    assert_eq!(publish.arg_values().nth(2), Some("2.2.0.0-b.3"));
    assert_eq!(publish.arg_after("-t"), Some("ninaAPI 2.2.0.0-beta 3"));
    assert!(publish.has_arg("-p"));

    assert!(ws.registry_manifest("2.2.0.0-beta").is_file());
}

#[tokio::test]
async fn commit_message_carries_version() {
    let ws = Workspace::new();
    ws.write_generated_manifest(STABLE_URL);
    let runner = RecordingRunner::new();
    let prompter = ScriptedPrompter::new(&[]);
    let config = quiet();
    let pipeline = ReleasePipeline::new(&ws.settings, &runner, &prompter, &config);

    pipeline
        .run_with_descriptor(&stable(false), ReleaseReport::new())
        .await
        .unwrap();

    let git = runner.commands_of("git");
    let commit = git
        .iter()
        .find(|c| c.arg_values().next() == Some("commit"))
        .unwrap();
    assert!(commit.arg_after("-m").unwrap().contains("2.2.0.0"));

    let registry = ws.root.path().join("nina.plugin.manifests");
    for command in &git {
        assert_eq!(
            command.cwd().canonicalize().unwrap(),
            registry.canonicalize().unwrap()
        );
    }
}

#[tokio::test]
async fn existing_manifest_folder_is_reused() {
    let ws = Workspace::new();
    ws.write_generated_manifest(STABLE_URL);
    let existing = ws.registry_manifest("2.2.0.0");
    std::fs::create_dir_all(existing.parent().unwrap()).unwrap();
    std::fs::write(&existing, "stale").unwrap();

    let runner = RecordingRunner::new();
    let prompter = ScriptedPrompter::new(&[]);
    let config = quiet();
    let pipeline = ReleasePipeline::new(&ws.settings, &runner, &prompter, &config);

    let report = pipeline
        .run_with_descriptor(&stable(false), ReleaseReport::new())
        .await
        .unwrap();

    assert_eq!(
        report.status_of(ReleaseStep::PlaceManifest),
        Some(&StepStatus::Succeeded)
    );
    assert!(std::fs::read_to_string(existing).unwrap().contains(STABLE_URL));
}

#[tokio::test]
async fn declined_docs_neither_validate_nor_deploy() {
    let ws = Workspace::new();
    ws.write_generated_manifest(STABLE_URL);
    // a broken spec must not matter when docs are declined
    ws.write_spec(MALFORMED_SPEC);
    let runner = RecordingRunner::new();
    let prompter = ScriptedPrompter::new(&[]);
    let config = quiet();
    let pipeline = ReleasePipeline::new(&ws.settings, &runner, &prompter, &config);

    let report = pipeline
        .run_with_descriptor(&stable(false), ReleaseReport::new())
        .await
        .unwrap();

    assert!(runner.commands_of("bump").is_empty());
    assert_eq!(report.status_of(ReleaseStep::ValidateSpec), Some(&StepStatus::Skipped));
    assert_eq!(report.status_of(ReleaseStep::DeployDocs), Some(&StepStatus::Skipped));
}

#[tokio::test]
async fn invalid_spec_blocks_deployment() {
    for (spec, expect_parse_error) in [(INVALID_SPEC, false), (MALFORMED_SPEC, true)] {
        let ws = Workspace::new();
        ws.write_generated_manifest(STABLE_URL);
        ws.write_spec(spec);
        let runner = RecordingRunner::new();
        let prompter = ScriptedPrompter::new(&[]);
        let config = quiet();
        let pipeline = ReleasePipeline::new(&ws.settings, &runner, &prompter, &config)
            .with_env(EnvConfig::from_vars([("BUMP", "tok-123")]));

        let result = pipeline
            .run_with_descriptor(&stable(true), ReleaseReport::new())
            .await;

        match result {
            Err(ReleaseError::Spec(SpecError::Parse { .. })) => assert!(expect_parse_error),
            Err(ReleaseError::Spec(SpecError::Invalid { violations, .. })) => {
                assert!(!expect_parse_error);
                assert!(violations.iter().any(|v| v.contains("must start with '/'")));
            }
            other => panic!("expected a spec error, got {:?}", other.map(|_| ())),
        }
        assert!(runner.commands_of("bump").is_empty());
        // the registry was still updated before the docs stage
        assert_eq!(runner.commands_of("git").len(), 5);
    }
}

#[tokio::test]
async fn valid_spec_deploys_with_injected_token() {
    let ws = Workspace::new();
    ws.write_generated_manifest(STABLE_URL);
    ws.write_spec(VALID_SPEC);
    let runner = RecordingRunner::new();
    let prompter = ScriptedPrompter::new(&[]);
    let config = quiet();
    let pipeline = ReleasePipeline::new(&ws.settings, &runner, &prompter, &config)
        .with_env(EnvConfig::from_vars([("BUMP", "tok-123")]));

    let report = pipeline
        .run_with_descriptor(&stable(true), ReleaseReport::new())
        .await
        .unwrap();

    let deploy = &runner.commands_of("bump")[0];
    assert!(deploy.arg_values().any(|v| v == "tok-123"));
    assert!(!deploy.display_line().contains("tok-123"));
    assert_eq!(deploy.arg_after("--doc"), Some("advanced-api"));
    assert_eq!(deploy.arg_after("--branch"), Some("v3"));
    assert_eq!(deploy.cwd(), ws.settings.project_dir.as_path());
    assert_eq!(report.status_of(ReleaseStep::DeployDocs), Some(&StepStatus::Succeeded));
}

#[tokio::test]
async fn deploy_token_read_from_project_env_file() {
    let ws = Workspace::new();
    ws.write_spec(VALID_SPEC);
    ws.settings_env_file("NINAAPI_RELEASE_TEST_TOKEN=from-file\n");
    let mut settings = ws.settings.clone();
    settings.docs.token_variable = "NINAAPI_RELEASE_TEST_TOKEN".to_string();

    let runner = RecordingRunner::new();
    let prompter = ScriptedPrompter::new(&[]);
    let config = quiet();
    let pipeline = ReleasePipeline::new(&settings, &runner, &prompter, &config);

    let mut report = ReleaseReport::new();
    pipeline.update_documentation(&mut report).await.unwrap();

    let deploy = &runner.commands_of("bump")[0];
    assert!(deploy.arg_values().any(|v| v == "from-file"));
}

#[tokio::test]
async fn continue_policy_records_failure_and_keeps_going() {
    let ws = Workspace::new();
    ws.write_generated_manifest(STABLE_URL);
    let runner = RecordingRunner::new().failing("git", Some("pull"));
    let prompter = ScriptedPrompter::new(&[]);
    let config = quiet();
    assert_eq!(ws.settings.on_failure, FailurePolicy::Continue);
    let pipeline = ReleasePipeline::new(&ws.settings, &runner, &prompter, &config);

    let report = pipeline
        .run_with_descriptor(&stable(false), ReleaseReport::new())
        .await
        .unwrap();

    // both pulls attempted, then the rest of the release
    assert_eq!(runner.commands_of("git").len(), 5);
    assert!(matches!(
        report.status_of(ReleaseStep::SyncRegistry),
        Some(StepStatus::Failed { .. })
    ));
    assert_eq!(
        report.status_of(ReleaseStep::CommitAndPush),
        Some(&StepStatus::Succeeded)
    );
    assert_eq!(report.failures().count(), 1);
}

#[tokio::test]
async fn abort_policy_stops_at_first_failure() {
    let ws = Workspace::new();
    ws.write_generated_manifest(STABLE_URL);
    let mut settings = ws.settings.clone();
    settings.on_failure = FailurePolicy::Abort;
    let runner = RecordingRunner::new().failing("gh", None);
    let prompter = ScriptedPrompter::new(&[]);
    let config = quiet();
    let pipeline = ReleasePipeline::new(&settings, &runner, &prompter, &config);

    let result = pipeline
        .run_with_descriptor(&stable(false), ReleaseReport::new())
        .await;

    assert!(matches!(
        result,
        Err(ReleaseError::Command(CommandError::Failed { .. }))
    ));
    assert!(runner.commands_of("git").is_empty());
    assert!(!ws.registry_manifest("2.2.0.0").exists());
}

#[tokio::test]
async fn missing_generated_manifest_stops_before_commit() {
    let ws = Workspace::new();
    let runner = RecordingRunner::new();
    let prompter = ScriptedPrompter::new(&[]);
    let config = quiet();
    let pipeline = ReleasePipeline::new(&ws.settings, &runner, &prompter, &config);

    let result = pipeline
        .run_with_descriptor(&stable(false), ReleaseReport::new())
        .await;

    assert!(matches!(result, Err(ReleaseError::Manifest(_))));
    assert!(
        runner
            .commands_of("git")
            .iter()
            .all(|c| c.arg_values().next() == Some("pull"))
    );
}

#[tokio::test]
async fn interactive_run_builds_then_prompts() {
    let ws = Workspace::new();
    ws.write_generated_manifest(BETA_URL);
    let runner = RecordingRunner::new();
    let prompter = ScriptedPrompter::new(&["y", "2.2.0.0", "2.2.0.0-beta", "3", "n"]);
    let config = quiet();
    let pipeline = ReleasePipeline::new(&ws.settings, &runner, &prompter, &config);

    let report = pipeline.run(DescriptorRequest::default()).await.unwrap();

    assert_eq!(report.descriptor, Some(beta()));
    assert_eq!(report.steps[0].step, ReleaseStep::Build);
    assert_eq!(prompter.questions.lock().unwrap().len(), 5);
    assert_eq!(runner.commands()[0].program(), "dotnet");
}
