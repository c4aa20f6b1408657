//! Error types for ninaapi_release operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ninaapi_release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all ninaapi_release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// External command errors
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// Manifest placement errors
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// OpenAPI document validation errors
    #[error("API specification error: {0}")]
    Spec(#[from] SpecError),

    /// Documentation deployment errors
    #[error("Documentation error: {0}")]
    Docs(#[from] DocsError),

    /// Settings file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },

    /// Reading operator input failed
    #[error("Failed to read operator input: {source}")]
    Input {
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// External command errors
#[derive(Error, Debug)]
pub enum CommandError {
    /// Command could not be started
    #[error("Failed to start '{command}': {source}")]
    Spawn {
        /// Displayed command line (secrets redacted)
        command: String,
        /// Spawn error
        #[source]
        source: std::io::Error,
    },

    /// Command ran but exited unsuccessfully
    #[error("'{command}' exited with {status}")]
    Failed {
        /// Displayed command line (secrets redacted)
        command: String,
        /// Exit status description
        status: String,
    },
}

/// Manifest placement errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Generated manifest is missing
    #[error("Generated manifest not found at {path}")]
    SourceMissing {
        /// Expected manifest path
        path: PathBuf,
    },

    /// Registry checkout is missing
    #[error("Manifest registry checkout not found at {path}")]
    RegistryMissing {
        /// Expected registry path
        path: PathBuf,
    },

    /// Filesystem operation failed
    #[error("Failed to {operation} {path}: {source}")]
    Filesystem {
        /// Operation that failed
        operation: &'static str,
        /// Path involved
        path: PathBuf,
        /// IO error
        #[source]
        source: std::io::Error,
    },
}

/// OpenAPI document validation errors
#[derive(Error, Debug)]
pub enum SpecError {
    /// Document could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Document path
        path: PathBuf,
        /// IO error
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid YAML
    #[error("{path} is not valid YAML: {source}")]
    Parse {
        /// Document path
        path: PathBuf,
        /// YAML error
        #[source]
        source: serde_yaml::Error,
    },

    /// Document violates the OpenAPI structure
    #[error("{path} is not a valid OpenAPI document:\n{}", .violations.join("\n"))]
    Invalid {
        /// Document path
        path: PathBuf,
        /// One entry per violation, each prefixed with its location
        violations: Vec<String>,
    },
}

/// Documentation deployment errors
#[derive(Error, Debug)]
pub enum DocsError {
    /// Deploy token not configured
    #[error("Deploy token '{variable}' is not set in the environment or .env file")]
    MissingToken {
        /// Variable name
        variable: String,
    },

    /// .env file unreadable
    #[error("Failed to load {path}: {reason}")]
    EnvFile {
        /// .env path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

/// Settings file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings file unreadable
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Settings path
        path: PathBuf,
        /// IO error
        #[source]
        source: std::io::Error,
    },

    /// Settings file malformed
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// Settings path
        path: PathBuf,
        /// TOML error
        #[source]
        source: toml::de::Error,
    },

    /// A setting holds an unusable value
    #[error("Invalid setting '{key}': {reason}")]
    InvalidValue {
        /// Setting key
        key: String,
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Cli(CliError::MissingArgument { argument }) => vec![
                format!("Pass {} on the command line", argument),
                "Or drop --yes to be prompted for missing values".to_string(),
            ],
            ReleaseError::Command(CommandError::Spawn { command, .. }) => vec![
                format!("Check that the program in '{}' is installed and on PATH", command),
                "Override program names in release.toml under [programs]".to_string(),
            ],
            ReleaseError::Command(CommandError::Failed { .. }) => vec![
                "Inspect the command output above".to_string(),
                "Rerun without --strict to continue past failing steps".to_string(),
            ],
            ReleaseError::Manifest(ManifestError::SourceMissing { .. }) => vec![
                "Check that the packaging step produced manifest.json".to_string(),
                "Run CreateNET7Manifest.ps1 manually to see its output".to_string(),
            ],
            ReleaseError::Manifest(ManifestError::RegistryMissing { path }) => vec![
                format!(
                    "Clone nina.plugin.manifests to {} or set registry.path in release.toml",
                    path.display()
                ),
            ],
            ReleaseError::Spec(_) => vec![
                "Fix the reported locations in the API specification".to_string(),
                "Re-check with: ninaapi_release validate".to_string(),
            ],
            ReleaseError::Docs(DocsError::MissingToken { variable }) => vec![
                format!("Add {}=<token> to the .env file in the plugin directory", variable),
                format!("Or export {} before running", variable),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ReleaseError::Cli(CliError::InvalidArguments { .. })
                | ReleaseError::Config(_)
                | ReleaseError::Manifest(ManifestError::RegistryMissing { .. })
        )
    }
}
