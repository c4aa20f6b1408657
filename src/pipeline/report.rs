//! Step-by-step record of a release run.

use crate::descriptor::ReleaseDescriptor;
use chrono::{DateTime, Utc};

/// Steps of a release, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReleaseStep {
    /// Plugin build
    Build,
    /// Manifest and archive generation
    Package,
    /// GitHub release creation
    Publish,
    /// Registry pulls from both remotes
    SyncRegistry,
    /// Manifest copy into the registry
    PlaceManifest,
    /// Registry manifest tests and operator confirmation
    VerifyManifests,
    /// Registry commit and push
    CommitAndPush,
    /// OpenAPI document validation
    ValidateSpec,
    /// Documentation deployment
    DeployDocs,
}

impl ReleaseStep {
    /// Short human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            ReleaseStep::Build => "build",
            ReleaseStep::Package => "package",
            ReleaseStep::Publish => "publish",
            ReleaseStep::SyncRegistry => "sync registry",
            ReleaseStep::PlaceManifest => "place manifest",
            ReleaseStep::VerifyManifests => "verify manifests",
            ReleaseStep::CommitAndPush => "commit and push",
            ReleaseStep::ValidateSpec => "validate API spec",
            ReleaseStep::DeployDocs => "deploy docs",
        }
    }
}

impl std::fmt::Display for ReleaseStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// Every command of the step succeeded
    Succeeded,
    /// At least one command failed; the run continued
    Failed {
        /// First failure of the step
        reason: String,
    },
    /// Not run, by operator choice
    Skipped,
}

/// One step's entry in the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// Step
    pub step: ReleaseStep,
    /// Outcome
    pub status: StepStatus,
    /// When the step finished
    pub finished_at: DateTime<Utc>,
}

/// Record of a release run
#[derive(Debug, Clone)]
pub struct ReleaseReport {
    /// Release being run, once collected
    pub descriptor: Option<ReleaseDescriptor>,
    /// Steps in execution order
    pub steps: Vec<StepRecord>,
    /// Release page, once published
    pub release_url: Option<String>,
    /// Run start
    pub started_at: DateTime<Utc>,
}

impl Default for ReleaseReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseReport {
    /// Empty report starting now
    pub fn new() -> Self {
        Self {
            descriptor: None,
            steps: Vec::new(),
            release_url: None,
            started_at: Utc::now(),
        }
    }

    /// Append a step outcome
    pub fn record(&mut self, step: ReleaseStep, status: StepStatus) {
        self.steps.push(StepRecord {
            step,
            status,
            finished_at: Utc::now(),
        });
    }

    /// Outcome of `step`, if it was reached
    pub fn status_of(&self, step: ReleaseStep) -> Option<&StepStatus> {
        self.steps
            .iter()
            .find(|record| record.step == step)
            .map(|record| &record.status)
    }

    /// Steps that failed
    pub fn failures(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps
            .iter()
            .filter(|record| matches!(record.status, StepStatus::Failed { .. }))
    }

    /// Whether no step failed
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Human-readable summary lines
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(descriptor) = &self.descriptor {
            lines.push(format!(
                "Release {} ({})",
                descriptor.release_tag(),
                if descriptor.is_beta() { "beta" } else { "stable" }
            ));
        }
        for record in &self.steps {
            let line = match &record.status {
                StepStatus::Succeeded => format!("✓ {}", record.step),
                StepStatus::Failed { reason } => format!("✗ {}: {}", record.step, reason),
                StepStatus::Skipped => format!("- {} (skipped)", record.step),
            };
            lines.push(line);
        }
        if let Some(url) = &self.release_url {
            lines.push(format!("Release page: {}", url));
        }
        let elapsed = Utc::now().signed_duration_since(self.started_at);
        lines.push(format!("Finished in {}s", elapsed.num_seconds()));
        lines
    }
}
