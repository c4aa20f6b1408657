//! Docs command execution: validate and deploy the documentation only.

use super::finish_documentation;
use crate::cli::{RuntimeConfig, TerminalPrompter};
use crate::config::{FailurePolicy, Settings};
use crate::error::Result;
use crate::pipeline::{ReleasePipeline, ReleaseReport, StepStatus};
use crate::process::SystemRunner;

/// Execute docs command
pub(super) async fn execute_docs(
    yes: bool,
    strict: bool,
    mut settings: Settings,
    config: &RuntimeConfig,
) -> Result<i32> {
    if strict {
        settings.on_failure = FailurePolicy::Abort;
    }

    let prompter = TerminalPrompter::new(yes);
    let runner = SystemRunner;
    let pipeline = ReleasePipeline::new(&settings, &runner, &prompter, config);

    let mut report = ReleaseReport::new();
    let outcome = pipeline.update_documentation(&mut report).await;
    let exit_code = finish_documentation(outcome, &prompter, config)?;

    for record in report.failures() {
        if let StepStatus::Failed { reason } = &record.status {
            config.warning_println(&format!("{} failed: {}", record.step, reason));
        }
    }
    Ok(exit_code)
}
