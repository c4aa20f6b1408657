//! Release command execution.

use super::finish_documentation;
use crate::cli::{DescriptorArgs, Prompter, RuntimeConfig, TerminalPrompter};
use crate::config::{FailurePolicy, Settings};
use crate::error::{ReleaseError, Result};
use crate::pipeline::{ReleasePipeline, ReleaseReport};
use crate::process::SystemRunner;

/// Execute release command
pub(super) async fn execute_release(
    descriptor: &DescriptorArgs,
    yes: bool,
    strict: bool,
    mut settings: Settings,
    config: &RuntimeConfig,
) -> Result<i32> {
    if strict {
        settings.on_failure = FailurePolicy::Abort;
    }

    let request = descriptor.to_request();
    if !request.is_complete() && !yes {
        config.println("Values not given as flags are asked for after the build");
    }

    let prompter = TerminalPrompter::new(yes);
    let runner = SystemRunner;
    let pipeline = ReleasePipeline::new(&settings, &runner, &prompter, config);

    config.println(&format!(
        "Releasing {} from {}",
        settings.plugin_name,
        settings.project_dir.display()
    ));

    let exit_code = match pipeline.run(request).await {
        Ok(report) => {
            print_summary(&report, config);
            0
        }
        Err(e @ ReleaseError::Spec(_)) => finish_documentation(Err(e), &prompter, config)?,
        Err(e) => return Err(e),
    };

    if exit_code == 0 {
        prompter.pause("Press enter to exit...")?;
    }
    Ok(exit_code)
}

fn print_summary(report: &ReleaseReport, config: &RuntimeConfig) {
    let _ = config.output().section("Release summary");
    for line in report.summary_lines() {
        config.indent(&line);
    }

    let failed = report.failures().count();
    if failed > 0 {
        config.warning_println(&format!(
            "{} step(s) failed; check their output above before announcing the release",
            failed
        ));
    }
}
