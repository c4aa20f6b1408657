//! External command execution.
//!
//! Every step of a release is an external program run in an explicit working
//! directory. [`CommandSpec`] describes one invocation, [`CommandRunner`]
//! executes it. [`SystemRunner`] spawns real processes sharing this
//! terminal, so tool output reaches the operator unchanged.

use crate::error::{CommandError, Result};
use std::future::Future;
use std::path::{Path, PathBuf};

/// Single argument of a command line
#[derive(Clone, PartialEq, Eq)]
struct CommandArg {
    value: String,
    secret: bool,
}

impl std::fmt::Debug for CommandArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.secret {
            f.write_str("***")
        } else {
            write!(f, "{:?}", self.value)
        }
    }
}

/// One external program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<CommandArg>,
    cwd: PathBuf,
}

impl CommandSpec {
    /// Start a command running `program` in `cwd`
    pub fn new(program: impl Into<String>, cwd: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(CommandArg {
            value: value.into(),
            secret: false,
        });
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self = self.arg(value);
        }
        self
    }

    /// Append an argument that must never be displayed or logged
    pub fn secret_arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(CommandArg {
            value: value.into(),
            secret: true,
        });
        self
    }

    /// Program name
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Working directory
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Argument values, secrets included; only for handing to the process
    pub fn arg_values(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|a| a.value.as_str())
    }

    /// Whether `value` appears as a non-secret argument
    pub fn has_arg(&self, value: &str) -> bool {
        self.args.iter().any(|a| !a.secret && a.value == value)
    }

    /// Non-secret argument following `flag`
    pub fn arg_after(&self, flag: &str) -> Option<&str> {
        let index = self.args.iter().position(|a| !a.secret && a.value == flag)?;
        self.args
            .get(index + 1)
            .filter(|a| !a.secret)
            .map(|a| a.value.as_str())
    }

    /// Printable command line; secrets appear as `***`
    pub fn display_line(&self) -> String {
        let mut line = quote(&self.program);
        for arg in &self.args {
            line.push(' ');
            if arg.secret {
                line.push_str("***");
            } else {
                line.push_str(&quote(&arg.value));
            }
        }
        line
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_line())
    }
}

fn quote(value: &str) -> String {
    if value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '"') {
        format!("\"{}\"", value.replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

/// Exit status of a finished command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    code: Option<i32>,
}

impl CommandStatus {
    /// Status with the given exit code; `None` when killed by a signal
    pub fn from_code(code: Option<i32>) -> Self {
        Self { code }
    }

    /// Successful status
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    /// Whether the command exited with code 0
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit code, if any
    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

impl std::fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => f.write_str("termination by signal"),
        }
    }
}

/// Executes external commands
pub trait CommandRunner {
    /// Run `command` to completion.
    ///
    /// `Err` means the program could not be started at all. A program that
    /// ran and failed is `Ok` with an unsuccessful status.
    fn run(&self, command: &CommandSpec) -> impl Future<Output = Result<CommandStatus>>;
}

/// Runs commands as child processes sharing this terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandStatus> {
        log::debug!("Running in {}: {}", command.cwd().display(), command);

        let status = tokio::process::Command::new(command.program())
            .args(command.arg_values())
            .current_dir(command.cwd())
            .status()
            .await
            .map_err(|source| CommandError::Spawn {
                command: command.display_line(),
                source,
            })?;

        log::debug!("'{}' finished with {:?}", command.program(), status.code());
        Ok(CommandStatus::from_code(status.code()))
    }
}

/// Whether `program` resolves to an executable on PATH
pub fn is_available(program: &str) -> bool {
    which::which(program).is_ok()
}
