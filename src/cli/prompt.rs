//! Operator prompts and manual gates.

use crate::error::{CliError, Result};
use std::io::{BufRead, Write};

/// Source of operator decisions
pub trait Prompter {
    /// Ask a free-form question, returning the trimmed answer
    fn ask(&self, question: &str) -> Result<String>;

    /// Ask a y/n question; only `y`/`yes` count as yes
    fn confirm(&self, question: &str) -> Result<bool>;

    /// Block until the operator acknowledges
    fn pause(&self, message: &str) -> Result<()>;
}

/// Prompter reading from the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter {
    assume_yes: bool,
}

impl TerminalPrompter {
    /// Create a terminal prompter.
    ///
    /// With `assume_yes`, gates pass without waiting. Questions and
    /// confirmations fail with `MissingArgument`, so an unattended run never
    /// guesses a decision the operator did not pass as a flag.
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    /// Whether the prompter runs unattended
    pub fn is_unattended(&self) -> bool {
        self.assume_yes
    }

    fn read_line(prompt: &str) -> Result<String> {
        print!("{}", prompt);
        std::io::stdout()
            .flush()
            .map_err(|source| CliError::Input { source })?;

        let mut input = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(|source| CliError::Input { source })?;
        Ok(input.trim().to_string())
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&self, question: &str) -> Result<String> {
        if self.assume_yes {
            return Err(CliError::MissingArgument {
                argument: question.trim_end_matches(':').trim().to_string(),
            }
            .into());
        }
        Self::read_line(&format!("{} ", question))
    }

    fn confirm(&self, question: &str) -> Result<bool> {
        if self.assume_yes {
            return Err(CliError::MissingArgument {
                argument: question.trim_end_matches('?').trim().to_string(),
            }
            .into());
        }
        let answer = Self::read_line(&format!("{} y/n: ", question))?;
        Ok(is_yes(&answer))
    }

    fn pause(&self, message: &str) -> Result<()> {
        if self.assume_yes {
            return Ok(());
        }
        Self::read_line(message).map(|_| ())
    }
}

/// Interpret a y/n answer
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
