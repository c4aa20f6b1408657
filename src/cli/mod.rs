//! Command line interface for ninaapi_release.
//!
//! Argument parsing, operator prompts, colored output and the command
//! executors that wire settings, runner and prompter into the pipeline.

mod args;
pub mod commands;
mod output;
pub mod prompt;

pub use args::{Args, Command, DescriptorArgs, RuntimeConfig};
pub use commands::execute_command;
pub use output::OutputManager;
pub use prompt::{Prompter, TerminalPrompter};

use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute_command(args).await
}
