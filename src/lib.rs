//! # ninaAPI Release
//!
//! Release automation for the Advanced API NINA plugin.
//!
//! A release builds the plugin, packages its installer manifest and archive,
//! publishes a GitHub release, registers the manifest in the shared
//! `nina.plugin.manifests` registry, and optionally deploys the API
//! documentation.
//!
//! ## Features
//!
//! - **Flags or prompts**: every release decision can be passed on the
//!   command line; anything missing is asked for interactively
//! - **Explicit failure policy**: failed tools are either logged and
//!   skipped past, or stop the release (`--strict`)
//! - **No ambient state**: every tool runs in an explicit working directory
//! - **Secret hygiene**: the documentation token is read only by the docs
//!   step and never printed
//! - **Dry runs**: `preview` prints every command without running any
//!
//! ## Usage
//!
//! ```bash
//! ninaapi_release release                      # interactive release
//! ninaapi_release release --stable --plugin-version 2.2.0.0 --folder 2.2.0.0 --no-docs --yes
//! ninaapi_release preview --beta-version 1 --plugin-version 2.2.0.0 --folder beta --docs
//! ninaapi_release validate                     # check api_spec_v3.yaml
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod docs;
pub mod env;
pub mod error;
pub mod github;
pub mod package;
pub mod pipeline;
pub mod process;
pub mod registry;

// Re-export main types for public API
pub use cli::{Args, Prompter, RuntimeConfig, TerminalPrompter};
pub use config::{FailurePolicy, Settings};
pub use descriptor::{DescriptorRequest, ReleaseChannel, ReleaseDescriptor};
pub use env::EnvConfig;
pub use error::{ReleaseError, Result};
pub use pipeline::{ReleasePipeline, ReleaseReport, ReleaseStep, StepStatus};
pub use process::{CommandRunner, CommandSpec, CommandStatus, SystemRunner};
