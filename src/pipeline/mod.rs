//! Release orchestration.
//!
//! Runs the release as a fixed sequence of steps:
//!
//! 1. Build the plugin
//! 2. Collect the release descriptor
//! 3. Package manifest and archive
//! 4. Publish the GitHub release
//! 5. Sync the manifest registry from both remotes
//! 6. Place the manifest in the registry
//! 7. Run the registry's manifest tests, then wait for the operator
//! 8. Commit and push the registry change
//! 9. Optionally validate and deploy the API documentation
//!
//! Whether a failed external command stops the run is decided by
//! [`FailurePolicy`]. Filesystem problems while placing the manifest and an
//! invalid API specification always stop it.

mod plan;
mod report;

pub use plan::{PlannedStep, plan_release};
pub use report::{ReleaseReport, ReleaseStep, StepRecord, StepStatus};

use crate::cli::{Prompter, RuntimeConfig};
use crate::config::{FailurePolicy, Settings};
use crate::descriptor::{DescriptorRequest, ReleaseDescriptor, collect_release_descriptor};
use crate::env::EnvConfig;
use crate::error::{CommandError, ReleaseError, Result};
use crate::github::{GitHubReleaseOptions, release_command};
use crate::process::{CommandRunner, CommandSpec};
use crate::{docs, package, registry};

/// Release orchestrator
pub struct ReleasePipeline<'a, R, P> {
    settings: &'a Settings,
    runner: &'a R,
    prompter: &'a P,
    config: &'a RuntimeConfig,
    env: Option<EnvConfig>,
}

impl<'a, R: CommandRunner, P: Prompter> ReleasePipeline<'a, R, P> {
    /// Create a pipeline over the given collaborators
    pub fn new(
        settings: &'a Settings,
        runner: &'a R,
        prompter: &'a P,
        config: &'a RuntimeConfig,
    ) -> Self {
        Self {
            settings,
            runner,
            prompter,
            config,
            env: None,
        }
    }

    /// Use `env` for the deploy token instead of the project's `.env` file
    pub fn with_env(mut self, env: EnvConfig) -> Self {
        self.env = Some(env);
        self
    }

    /// Run the complete release.
    ///
    /// Gaps in `request` are prompted for after the build, before anything
    /// is published.
    pub async fn run(&self, request: DescriptorRequest) -> Result<ReleaseReport> {
        let mut report = ReleaseReport::new();

        self.build(&mut report).await?;

        let descriptor = collect_release_descriptor(request, self.prompter)?;
        self.run_with_descriptor(&descriptor, report).await
    }

    /// Run every step after the build for a known descriptor
    pub async fn run_with_descriptor(
        &self,
        descriptor: &ReleaseDescriptor,
        mut report: ReleaseReport,
    ) -> Result<ReleaseReport> {
        report.descriptor = Some(descriptor.clone());
        log::info!(
            "Releasing {} {} into folder '{}'",
            self.settings.plugin_name,
            descriptor.release_tag(),
            descriptor.target_folder()
        );

        self.package(descriptor, &mut report).await?;
        self.publish(descriptor, &mut report).await?;
        self.sync_manifest_registry(&mut report).await?;
        self.place_manifest(descriptor, &mut report)?;
        self.verify_manifests(&mut report).await?;
        self.commit_and_push(descriptor, &mut report).await?;

        if descriptor.update_docs() {
            self.update_documentation(&mut report).await?;
        } else {
            report.record(ReleaseStep::ValidateSpec, StepStatus::Skipped);
            report.record(ReleaseStep::DeployDocs, StepStatus::Skipped);
        }

        Ok(report)
    }

    /// Build the plugin in Release/AnyCPU
    pub async fn build(&self, report: &mut ReleaseReport) -> Result<()> {
        self.config.println("🔨 Building plugin...");
        let command = package::build_command(self.settings);
        self.run_step(ReleaseStep::Build, vec![command], report).await
    }

    /// Generate manifest and archive
    pub async fn package(
        &self,
        descriptor: &ReleaseDescriptor,
        report: &mut ReleaseReport,
    ) -> Result<()> {
        self.config.println(&format!(
            "📦 Packaging {} manifest...",
            if descriptor.is_beta() { "beta" } else { "stable" }
        ));
        let command = package::package_command(self.settings, descriptor);
        self.run_step(ReleaseStep::Package, vec![command], report).await
    }

    /// Create the GitHub release with the archive attached
    pub async fn publish(
        &self,
        descriptor: &ReleaseDescriptor,
        report: &mut ReleaseReport,
    ) -> Result<()> {
        let options = GitHubReleaseOptions::for_release(self.settings, descriptor);
        self.config.println(&format!(
            "🚀 Publishing release {}{}...",
            options.tag_name,
            if options.prerelease { " (prerelease)" } else { "" }
        ));
        let command = release_command(self.settings, &options);
        self.run_step(ReleaseStep::Publish, vec![command], report).await?;

        if report.status_of(ReleaseStep::Publish) == Some(&StepStatus::Succeeded) {
            let url = options.html_url();
            self.config.success_println(&format!("Release created: {}", url));
            report.release_url = Some(url);
        }
        Ok(())
    }

    /// Pull the registry from its default remote and from upstream
    pub async fn sync_manifest_registry(&self, report: &mut ReleaseReport) -> Result<()> {
        self.config.println(&format!(
            "🔄 Syncing manifest registry at {}...",
            self.settings.registry_dir().display()
        ));
        let commands = registry::sync_commands(self.settings);
        self.run_step(ReleaseStep::SyncRegistry, commands, report).await
    }

    /// Copy the generated manifest into the registry and sanity-check it
    pub fn place_manifest(
        &self,
        descriptor: &ReleaseDescriptor,
        report: &mut ReleaseReport,
    ) -> Result<()> {
        self.config.println("📄 Placing manifest...");
        let destination = match registry::place_manifest(self.settings, descriptor) {
            Ok(destination) => destination,
            Err(e) => {
                report.record(
                    ReleaseStep::PlaceManifest,
                    StepStatus::Failed {
                        reason: e.to_string(),
                    },
                );
                return Err(e);
            }
        };
        report.record(ReleaseStep::PlaceManifest, StepStatus::Succeeded);
        self.config
            .verbose_println(&format!("✓ Manifest at {}", destination.display()));

        let expected_url = descriptor.installer_url(
            &self.settings.github.repository,
            &self.settings.package.archive_name,
        );
        let check = registry::check_manifest(&destination, &expected_url)?;
        for warning in &check.warnings {
            log::warn!("Manifest check: {}", warning);
            self.config.warning_println(warning);
        }
        Ok(())
    }

    /// Run the registry's manifest tests and wait for the operator's verdict
    pub async fn verify_manifests(&self, report: &mut ReleaseReport) -> Result<()> {
        self.config.println("Now testing the manifests...");
        let command = registry::test_command(self.settings);
        self.run_step(ReleaseStep::VerifyManifests, vec![command], report)
            .await?;

        self.config
            .println("Please verify that the test ran successfully");
        self.prompter.pause("Press enter to continue...")
    }

    /// Commit the manifest folder and push it
    pub async fn commit_and_push(
        &self,
        descriptor: &ReleaseDescriptor,
        report: &mut ReleaseReport,
    ) -> Result<()> {
        self.config.println("📝 Committing manifest...");
        let commands = registry::commit_commands(self.settings, descriptor);
        self.run_step(ReleaseStep::CommitAndPush, commands, report)
            .await
    }

    /// Validate the API specification and deploy it.
    ///
    /// An invalid specification is always fatal and nothing is deployed.
    pub async fn update_documentation(&self, report: &mut ReleaseReport) -> Result<()> {
        let spec_path = self.settings.spec_path();
        self.config
            .println(&format!("🔍 Validating {}...", spec_path.display()));

        match docs::validate_spec_file(&spec_path) {
            Ok(summary) => {
                report.record(ReleaseStep::ValidateSpec, StepStatus::Succeeded);
                self.config.success_println(&format!(
                    "The specification is valid ({} {}, {} operations)",
                    summary.title, summary.version, summary.operations
                ));
            }
            Err(e) => {
                report.record(
                    ReleaseStep::ValidateSpec,
                    StepStatus::Failed {
                        reason: e.to_string(),
                    },
                );
                return Err(e);
            }
        }

        let token = match &self.env {
            Some(env) => docs::load_token(self.settings, env)?,
            None => docs::load_token(self.settings, &EnvConfig::load(&self.settings.env_file())?)?,
        };

        self.config.println("📚 Deploying documentation...");
        let command = docs::deploy_command(self.settings, &token);
        self.run_step(ReleaseStep::DeployDocs, vec![command], report)
            .await
    }

    /// Run a step's commands in order and record the step outcome.
    ///
    /// Under [`FailurePolicy::Continue`] every command of the step runs even
    /// after one fails; the first failure is what the report shows.
    async fn run_step(
        &self,
        step: ReleaseStep,
        commands: Vec<CommandSpec>,
        report: &mut ReleaseReport,
    ) -> Result<()> {
        let mut first_failure: Option<CommandError> = None;

        for command in &commands {
            self.config.verbose_println(&format!("$ {}", command));

            let failure = match self.runner.run(command).await {
                Ok(status) if status.is_success() => continue,
                Ok(status) => CommandError::Failed {
                    command: command.display_line(),
                    status: status.to_string(),
                },
                Err(ReleaseError::Command(e)) => e,
                Err(other) => return Err(other),
            };

            match self.settings.on_failure {
                FailurePolicy::Abort => {
                    report.record(
                        step,
                        StepStatus::Failed {
                            reason: failure.to_string(),
                        },
                    );
                    return Err(failure.into());
                }
                FailurePolicy::Continue => {
                    log::warn!("Step '{}' failed, continuing: {}", step, failure);
                    self.config
                        .warning_println(&format!("{} failed, continuing: {}", step, failure));
                    first_failure.get_or_insert(failure);
                }
            }
        }

        let status = match first_failure {
            Some(failure) => StepStatus::Failed {
                reason: failure.to_string(),
            },
            None => StepStatus::Succeeded,
        };
        report.record(step, status);
        Ok(())
    }
}
