//! Preview command execution: show the release plan, run nothing.

use crate::cli::{DescriptorArgs, RuntimeConfig, TerminalPrompter};
use crate::config::Settings;
use crate::descriptor::collect_release_descriptor;
use crate::error::Result;
use crate::pipeline::plan_release;
use crate::process::is_available;
use std::collections::BTreeSet;

/// Execute preview command
pub(super) fn execute_preview(
    descriptor: &DescriptorArgs,
    settings: &Settings,
    config: &RuntimeConfig,
) -> Result<i32> {
    let prompter = TerminalPrompter::new(false);
    let descriptor = collect_release_descriptor(descriptor.to_request(), &prompter)?;
    let plan = plan_release(settings, &descriptor);

    let _ = config.output().section(&format!(
        "Release plan for {} {}",
        settings.plugin_name,
        descriptor.release_tag()
    ));

    let mut programs = BTreeSet::new();
    for (index, planned) in plan.iter().enumerate() {
        config.println(&format!("{}. {}", index + 1, planned.step));
        for command in &planned.commands {
            config.indent(&format!("$ {}", command));
            config.indent(&format!("  (in {})", command.cwd().display()));
            programs.insert(command.program().to_string());
        }
        for note in &planned.notes {
            config.indent(note);
        }
    }

    let missing: Vec<_> = programs
        .into_iter()
        .filter(|program| !is_available(program))
        .collect();
    for program in &missing {
        config.warning_println(&format!("'{}' not found on PATH", program));
    }

    if !settings.registry_dir().is_dir() {
        config.warning_println(&format!(
            "Manifest registry checkout not found at {}",
            settings.registry_dir().display()
        ));
    }

    Ok(0)
}
