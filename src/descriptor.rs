//! Release descriptor: what is being released and how.
//!
//! Built once at the start of a run from command-line flags, with any gaps
//! filled by operator prompts. Every naming convention derived from the
//! version (tag, title, installer URL, commit message) lives here.

use crate::cli::Prompter;
use crate::error::{CliError, ReleaseError, Result};

/// Stable or beta release
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseChannel {
    /// Regular release
    Stable,
    /// Prerelease with a beta build number
    Beta {
        /// Beta build, e.g. "3" in "2.2.0.0-b.3"
        build: String,
    },
}

/// Everything the pipeline needs to know about one release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    version: String,
    channel: ReleaseChannel,
    target_folder: String,
    update_docs: bool,
}

/// Partially known descriptor; `None` fields are prompted for
#[derive(Debug, Clone, Default)]
pub struct DescriptorRequest {
    /// Beta (`true`) or stable (`false`) release
    pub beta: Option<bool>,
    /// Plugin version
    pub version: Option<String>,
    /// Beta build number
    pub beta_version: Option<String>,
    /// Manifest subfolder inside the registry
    pub folder: Option<String>,
    /// Deploy API documentation after the registry update
    pub update_docs: Option<bool>,
}

impl ReleaseDescriptor {
    /// Create a validated descriptor
    pub fn new(
        version: impl Into<String>,
        channel: ReleaseChannel,
        target_folder: impl Into<String>,
        update_docs: bool,
    ) -> Result<Self> {
        let version = version.into().trim().to_string();
        let target_folder = target_folder.into().trim().to_string();

        if version.is_empty() {
            return Err(invalid("version must not be empty"));
        }
        if version.chars().any(char::is_whitespace) {
            return Err(invalid(format!("version '{}' must not contain whitespace", version)));
        }
        validate_folder(&target_folder)?;

        let channel = match channel {
            ReleaseChannel::Beta { build } => {
                let build = build.trim().to_string();
                if build.is_empty() {
                    return Err(invalid("beta version must not be empty for a beta release"));
                }
                ReleaseChannel::Beta { build }
            }
            ReleaseChannel::Stable => ReleaseChannel::Stable,
        };

        Ok(Self {
            version,
            channel,
            target_folder,
            update_docs,
        })
    }

    /// Plugin version as entered
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Release channel
    pub fn channel(&self) -> &ReleaseChannel {
        &self.channel
    }

    /// Whether this is a beta release
    pub fn is_beta(&self) -> bool {
        matches!(self.channel, ReleaseChannel::Beta { .. })
    }

    /// Beta build number, for beta releases
    pub fn beta_version(&self) -> Option<&str> {
        match &self.channel {
            ReleaseChannel::Beta { build } => Some(build),
            ReleaseChannel::Stable => None,
        }
    }

    /// Registry subfolder receiving the manifest
    pub fn target_folder(&self) -> &str {
        &self.target_folder
    }

    /// Whether documentation is deployed at the end of the run
    pub fn update_docs(&self) -> bool {
        self.update_docs
    }

    /// Release tag: `{version}` or `{version}-b.{beta}`
    pub fn release_tag(&self) -> String {
        match &self.channel {
            ReleaseChannel::Stable => self.version.clone(),
            ReleaseChannel::Beta { build } => format!("{}-b.{}", self.version, build),
        }
    }

    /// Release title shown on GitHub
    pub fn release_title(&self, plugin_name: &str) -> String {
        match &self.channel {
            ReleaseChannel::Stable => format!("{} {}", plugin_name, self.version),
            ReleaseChannel::Beta { build } => {
                format!("{} {}-beta {}", plugin_name, self.version, build)
            }
        }
    }

    /// Download URL of the release archive, written into the manifest
    pub fn installer_url(&self, repository: &str, archive_name: &str) -> String {
        format!(
            "https://github.com/{}/releases/download/{}/{}",
            repository,
            self.release_tag(),
            archive_name
        )
    }

    /// Registry commit message
    pub fn commit_message(&self, plugin_name: &str) -> String {
        format!("Added {} manifest for version {}", plugin_name, self.version)
    }
}

impl DescriptorRequest {
    /// Whether every field is already known
    pub fn is_complete(&self) -> bool {
        self.beta.is_some()
            && self.version.is_some()
            && self.folder.is_some()
            && self.update_docs.is_some()
            && (self.beta == Some(false) || self.beta_version.is_some())
    }
}

/// Fill the gaps of `request` by prompting, in the order the operator is used to.
pub fn collect_release_descriptor(
    request: DescriptorRequest,
    prompter: &impl Prompter,
) -> Result<ReleaseDescriptor> {
    let beta = match request.beta {
        Some(beta) => beta,
        None => confirm_required(prompter, "Is this a beta release?", "--beta or --stable")?,
    };
    let version = match request.version {
        Some(version) => version,
        None => ask_required(prompter, "Plugin version:", "--plugin-version")?,
    };
    let folder = match request.folder {
        Some(folder) => folder,
        None => ask_required(
            prompter,
            "The folder in which the manifest should be located:",
            "--folder",
        )?,
    };
    let channel = if beta {
        let build = match request.beta_version {
            Some(build) => build,
            None => ask_required(prompter, "Beta version:", "--beta-version")?,
        };
        ReleaseChannel::Beta { build }
    } else {
        ReleaseChannel::Stable
    };
    let update_docs = match request.update_docs {
        Some(update) => update,
        None => confirm_required(
            prompter,
            "Do you want to update the documentation?",
            "--docs or --no-docs",
        )?,
    };

    ReleaseDescriptor::new(version, channel, folder, update_docs)
}

fn ask_required(prompter: &impl Prompter, question: &str, flag: &str) -> Result<String> {
    prompter.ask(question).map_err(|e| name_flag(e, flag))
}

fn confirm_required(prompter: &impl Prompter, question: &str, flag: &str) -> Result<bool> {
    prompter.confirm(question).map_err(|e| name_flag(e, flag))
}

/// Report an unanswerable prompt as the flag that would have answered it
fn name_flag(error: ReleaseError, flag: &str) -> ReleaseError {
    match error {
        ReleaseError::Cli(CliError::MissingArgument { .. }) => CliError::MissingArgument {
            argument: flag.to_string(),
        }
        .into(),
        other => other,
    }
}

fn validate_folder(folder: &str) -> Result<()> {
    if folder.is_empty() {
        return Err(invalid("manifest folder must not be empty"));
    }
    if folder == "." || folder == ".." || folder.contains(['/', '\\']) {
        return Err(invalid(format!(
            "manifest folder '{}' must be a single directory name",
            folder
        )));
    }
    Ok(())
}

fn invalid(reason: impl Into<String>) -> ReleaseError {
    CliError::InvalidArguments {
        reason: reason.into(),
    }
    .into()
}
