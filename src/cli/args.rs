//! Command line argument parsing and validation.
//!
//! Every decision the release needs can be given as a flag; whatever is left
//! out is asked for interactively, the way the release has always been run.

use crate::descriptor::DescriptorRequest;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Release tool for the Advanced API NINA plugin
#[derive(Parser, Debug)]
#[command(
    name = "ninaapi_release",
    version,
    about = "Release tool for the Advanced API NINA plugin",
    long_about = "Build, package and publish a ninaAPI release, register its manifest
in nina.plugin.manifests, and optionally deploy the API documentation.

Usage:
  ninaapi_release release
  ninaapi_release release --beta --plugin-version 2.2.0.0 --beta-version 3 --folder 2.2.0.0-beta --no-docs
  ninaapi_release preview --stable --plugin-version 2.2.0.0 --folder 2.2.0.0
  ninaapi_release validate"
)]
pub struct Args {
    /// Settings file (default: release.toml in the project directory)
    #[arg(long, global = true, value_name = "FILE", env = "NINAAPI_RELEASE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Plugin project directory
    #[arg(long, short = 'C', global = true, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Show every command line before it runs
    #[arg(long, short, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Release descriptor flags shared by `release` and `preview`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct DescriptorArgs {
    /// Beta release (prerelease, tagged {version}-b.{beta-version})
    #[arg(long, conflicts_with = "stable")]
    pub beta: bool,

    /// Stable release
    #[arg(long)]
    pub stable: bool,

    /// Plugin version, e.g. 2.2.0.0
    #[arg(long, value_name = "VERSION")]
    pub plugin_version: Option<String>,

    /// Beta build number; implies --beta
    #[arg(long, value_name = "N", conflicts_with = "stable")]
    pub beta_version: Option<String>,

    /// Registry folder receiving the manifest
    #[arg(long, value_name = "FOLDER")]
    pub folder: Option<String>,

    /// Deploy the API documentation after the registry update
    #[arg(long, conflicts_with = "no_docs")]
    pub docs: bool,

    /// Skip the documentation update
    #[arg(long)]
    pub no_docs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full release
    Release {
        /// Release decisions
        #[command(flatten)]
        descriptor: DescriptorArgs,

        /// Never prompt: missing values are errors, gates pass automatically
        #[arg(long, short = 'y')]
        yes: bool,

        /// Stop at the first failing command
        #[arg(long)]
        strict: bool,
    },

    /// Print the commands a release would run without running anything
    Preview {
        /// Release decisions
        #[command(flatten)]
        descriptor: DescriptorArgs,
    },

    /// Validate the OpenAPI document
    Validate {
        /// Document to validate (default: docs.spec_file of the settings)
        #[arg(long, value_name = "FILE")]
        spec: Option<PathBuf>,
    },

    /// Validate and deploy the API documentation only
    Docs {
        /// Never wait for a keypress
        #[arg(long, short = 'y')]
        yes: bool,

        /// Stop if the deploy command fails
        #[arg(long)]
        strict: bool,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if let Command::Release { descriptor, .. } | Command::Preview { descriptor } = &self.command {
            for (flag, value) in [
                ("--plugin-version", &descriptor.plugin_version),
                ("--beta-version", &descriptor.beta_version),
                ("--folder", &descriptor.folder),
            ] {
                if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                    return Err(format!("{} must not be empty", flag));
                }
            }
        }
        Ok(())
    }
}

impl Command {
    /// Command name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Release { .. } => "release",
            Command::Preview { .. } => "preview",
            Command::Validate { .. } => "validate",
            Command::Docs { .. } => "docs",
        }
    }
}

impl DescriptorArgs {
    /// Descriptor fields known from flags
    pub fn to_request(&self) -> DescriptorRequest {
        let beta = if self.beta || self.beta_version.is_some() {
            Some(true)
        } else if self.stable {
            Some(false)
        } else {
            None
        };
        let update_docs = if self.docs {
            Some(true)
        } else if self.no_docs {
            Some(false)
        } else {
            None
        };
        DescriptorRequest {
            beta,
            version: self.plugin_version.clone(),
            beta_version: self.beta_version.clone(),
            folder: self.folder.clone(),
            update_docs,
        }
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(verbose, quiet),
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print message only in verbose mode
    pub fn verbose_println(&self, message: &str) {
        let _ = self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message (shown even in quiet mode)
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }

    /// Check if verbose output is enabled
    pub fn is_verbose(&self) -> bool {
        self.output.is_verbose()
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.verbose, args.quiet)
    }
}
