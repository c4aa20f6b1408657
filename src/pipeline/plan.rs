//! Dry-run view of a release.

use super::ReleaseStep;
use crate::config::Settings;
use crate::descriptor::ReleaseDescriptor;
use crate::github::{GitHubReleaseOptions, release_command};
use crate::process::CommandSpec;
use crate::{docs, package, registry};

/// What one step would do
#[derive(Debug, Clone)]
pub struct PlannedStep {
    /// Step
    pub step: ReleaseStep,
    /// Commands the step runs
    pub commands: Vec<CommandSpec>,
    /// Non-command actions, described
    pub notes: Vec<String>,
}

impl PlannedStep {
    fn commands(step: ReleaseStep, commands: Vec<CommandSpec>) -> Self {
        Self {
            step,
            commands,
            notes: Vec::new(),
        }
    }

    fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// Every step a release of `descriptor` would take, in order.
///
/// The deploy token is never read; the deploy command shows it redacted.
pub fn plan_release(settings: &Settings, descriptor: &ReleaseDescriptor) -> Vec<PlannedStep> {
    let options = GitHubReleaseOptions::for_release(settings, descriptor);
    let manifest_destination = settings
        .registry_dir()
        .join(registry::manifest_folder(settings, descriptor))
        .join("manifest.json");

    let mut plan = vec![
        PlannedStep::commands(ReleaseStep::Build, vec![package::build_command(settings)]),
        PlannedStep::commands(
            ReleaseStep::Package,
            vec![package::package_command(settings, descriptor)],
        ),
        PlannedStep::commands(ReleaseStep::Publish, vec![release_command(settings, &options)]),
        PlannedStep::commands(ReleaseStep::SyncRegistry, registry::sync_commands(settings)),
        PlannedStep::commands(ReleaseStep::PlaceManifest, Vec::new()).note(format!(
            "copy {} -> {}",
            settings.generated_manifest().display(),
            manifest_destination.display()
        )),
        PlannedStep::commands(
            ReleaseStep::VerifyManifests,
            vec![registry::test_command(settings)],
        )
        .note("wait for operator confirmation"),
        PlannedStep::commands(
            ReleaseStep::CommitAndPush,
            registry::commit_commands(settings, descriptor),
        ),
    ];

    if descriptor.update_docs() {
        plan.push(
            PlannedStep::commands(ReleaseStep::ValidateSpec, Vec::new())
                .note(format!("validate {}", settings.spec_path().display())),
        );
        plan.push(
            PlannedStep::commands(
                ReleaseStep::DeployDocs,
                vec![docs::deploy_command(settings, "")],
            )
            .note(format!(
                "token from {} or {}",
                settings.docs.token_variable,
                settings.env_file().display()
            )),
        );
    }

    plan
}
