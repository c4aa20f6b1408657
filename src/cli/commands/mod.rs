//! Command execution functions coordinating all release operations.
//!
//! Each executor loads settings, wires the real runner and prompter into
//! the pipeline, and turns the outcome into an exit code.

mod docs;
mod preview;
mod release;
mod validate;

use crate::cli::{Args, Command, Prompter, RuntimeConfig};
use crate::config::Settings;
use crate::error::{ReleaseError, Result};

use docs::execute_docs;
use preview::execute_preview;
use release::execute_release;
use validate::execute_validate;

/// Execute the main command based on parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    // Validate arguments
    if let Err(validation_error) = args.validate() {
        // Create output for validation errors (never quiet)
        let output = super::OutputManager::new(false, false);
        output.error(&format!("Invalid arguments: {}", validation_error));
        return Ok(1);
    }

    let config = RuntimeConfig::from(&args);
    let settings = match Settings::load(args.project_dir.as_deref(), args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            report_failure(&config, args.command.name(), &e);
            return Ok(1);
        }
    };

    let result = match &args.command {
        Command::Release {
            descriptor,
            yes,
            strict,
        } => execute_release(descriptor, *yes, *strict, settings, &config).await,
        Command::Preview { descriptor } => execute_preview(descriptor, &settings, &config),
        Command::Validate { spec } => execute_validate(spec.as_deref(), &settings, &config),
        Command::Docs { yes, strict } => execute_docs(*yes, *strict, settings, &config).await,
    };

    match result {
        Ok(exit_code) => {
            if exit_code == 0 && !config.output().is_quiet() {
                config.success_println(&format!(
                    "Command '{}' completed successfully",
                    args.command.name()
                ));
            }
            Ok(exit_code)
        }
        Err(e) => {
            report_failure(&config, args.command.name(), &e);
            Ok(1)
        }
    }
}

fn report_failure(config: &RuntimeConfig, command: &str, e: &ReleaseError) {
    config.error_println(&format!("Command '{}' failed: {}", command, e));

    let suggestions = e.recovery_suggestions();
    if !suggestions.is_empty() {
        config.println("\n💡 Recovery suggestions:");
        for suggestion in suggestions {
            config.println(&format!("  • {}", suggestion));
        }
    }
}

/// Handle the end of a documentation run.
///
/// An invalid specification is shown, the operator acknowledges it, and the
/// run ends with exit code 1. Other errors propagate.
pub(super) fn finish_documentation(
    outcome: Result<()>,
    prompter: &impl Prompter,
    config: &RuntimeConfig,
) -> Result<i32> {
    match outcome {
        Ok(()) => Ok(0),
        Err(ReleaseError::Spec(e)) => {
            config.error_println(&e.to_string());
            prompter.pause("Press enter to exit...")?;
            Ok(1)
        }
        Err(e) => Err(e),
    }
}
