//! Release settings loaded from `release.toml`.
//!
//! Every key is optional. Defaults reproduce the established ninaAPI release
//! layout, so a checkout without a settings file releases the usual way.

use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings file looked up in the project directory when `--config` is absent
pub const DEFAULT_SETTINGS_FILE: &str = "release.toml";

/// What to do when an external command exits unsuccessfully
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure, record it in the report, run the next step
    #[default]
    Continue,
    /// Stop the release at the failed step
    Abort,
}

/// Complete release settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Plugin project directory (csproj, packaging script, manifest output)
    pub project_dir: PathBuf,
    /// Plugin display and registry name
    pub plugin_name: String,
    /// Failure policy for external commands
    pub on_failure: FailurePolicy,
    /// Build step
    pub build: BuildSettings,
    /// Packaging step
    pub package: PackageSettings,
    /// GitHub release step
    pub github: GitHubSettings,
    /// Manifest registry steps
    pub registry: RegistrySettings,
    /// Documentation steps
    pub docs: DocsSettings,
    /// External program names
    pub programs: Programs,
}

/// Build step settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSettings {
    /// Project file passed to `dotnet build`
    pub project_file: String,
    /// Build configuration
    pub configuration: String,
    /// Build platform
    pub platform: String,
}

/// Packaging step settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageSettings {
    /// Manifest generation script, relative to the project directory
    pub script: String,
    /// Built plugin assembly; defaults to the NINA plugin install location
    pub plugin_binary: Option<PathBuf>,
    /// Archive produced by the script and uploaded to the release
    pub archive_name: String,
    /// Manifest produced by the script, relative to the project directory
    pub manifest_file: String,
}

/// GitHub release settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubSettings {
    /// Repository slug (owner/repo)
    pub repository: String,
}

/// Manifest registry settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrySettings {
    /// Registry checkout, relative to the project directory
    pub path: PathBuf,
    /// Upstream repository pulled after the default remote
    pub upstream_url: String,
    /// Remote pushed to
    pub push_remote: String,
    /// Branch pushed to
    pub push_branch: String,
    /// Directory holding this plugin's manifests, relative to the registry
    pub manifest_root: String,
    /// Manifest test command, run in the registry
    pub test_command: Vec<String>,
}

/// Documentation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsSettings {
    /// OpenAPI document, relative to the project directory
    pub spec_file: String,
    /// Documentation slug on the hosting platform
    pub doc_slug: String,
    /// Documentation branch
    pub branch: String,
    /// Variable holding the deploy token
    pub token_variable: String,
    /// Env file, relative to the project directory
    pub env_file: String,
}

/// External program names
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Programs {
    /// .NET CLI
    pub dotnet: String,
    /// PowerShell, runs the packaging script
    pub pwsh: String,
    /// GitHub CLI
    pub gh: String,
    /// Git
    pub git: String,
    /// Documentation deploy CLI
    pub bump: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            plugin_name: "ninaAPI".to_string(),
            on_failure: FailurePolicy::Continue,
            build: BuildSettings::default(),
            package: PackageSettings::default(),
            github: GitHubSettings::default(),
            registry: RegistrySettings::default(),
            docs: DocsSettings::default(),
            programs: Programs::default(),
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            project_file: "ninaAPI.csproj".to_string(),
            configuration: "Release".to_string(),
            platform: "AnyCPU".to_string(),
        }
    }
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            script: "CreateNET7Manifest.ps1".to_string(),
            plugin_binary: None,
            archive_name: "ninaAPI.zip".to_string(),
            manifest_file: "manifest.json".to_string(),
        }
    }
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            repository: "christian-photo/ninaAPI".to_string(),
        }
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("../../nina.plugin.manifests"),
            upstream_url: "https://github.com/isbeorn/nina.plugin.manifests.git".to_string(),
            push_remote: "origin".to_string(),
            push_branch: "main".to_string(),
            manifest_root: "manifests/n/ninaAPI/3.0.0".to_string(),
            test_command: vec!["node".to_string(), "gather".to_string()],
        }
    }
}

impl Default for DocsSettings {
    fn default() -> Self {
        Self {
            spec_file: "api_spec_v3.yaml".to_string(),
            doc_slug: "advanced-api".to_string(),
            branch: "v3".to_string(),
            token_variable: "BUMP".to_string(),
            env_file: ".env".to_string(),
        }
    }
}

impl Default for Programs {
    fn default() -> Self {
        Self {
            dotnet: "dotnet".to_string(),
            pwsh: "pwsh".to_string(),
            gh: "gh".to_string(),
            git: "git".to_string(),
            bump: "bump".to_string(),
        }
    }
}

impl Settings {
    /// Load settings for a project.
    ///
    /// An explicit `config` path must exist. Without one, `release.toml` in
    /// the project directory is used when present, defaults otherwise. The
    /// project directory argument always wins over the file's `project_dir`.
    pub fn load(project_dir: Option<&Path>, config: Option<&Path>) -> Result<Self> {
        let base = project_dir.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

        let mut settings = match config {
            Some(path) => Self::from_file(path)?,
            None => {
                let candidate = base.join(DEFAULT_SETTINGS_FILE);
                if candidate.is_file() {
                    Self::from_file(&candidate)?
                } else {
                    log::debug!("No {} in {}, using defaults", DEFAULT_SETTINGS_FILE, base.display());
                    Self::default()
                }
            }
        };

        if let Some(dir) = project_dir {
            settings.project_dir = dir.to_path_buf();
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Parse a settings file.
    ///
    /// A relative `project_dir` in the file is relative to the file's own
    /// directory, not to the working directory of the process.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings = Self::from_toml(&content, path)?;

        if settings.project_dir.is_relative() && declares_project_dir(&content) {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            settings.project_dir = base.join(&settings.project_dir);
        }
        Ok(settings)
    }

    fn from_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
            .into()
        })
    }

    /// Reject values no step could work with
    pub fn validate(&self) -> Result<()> {
        let (owner, repo) = self.github.repository.split_once('/').ok_or_else(|| {
            ConfigError::InvalidValue {
                key: "github.repository".to_string(),
                reason: format!("'{}' is not in owner/repo form", self.github.repository),
            }
        })?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return Err(ConfigError::InvalidValue {
                key: "github.repository".to_string(),
                reason: format!("'{}' is not in owner/repo form", self.github.repository),
            }
            .into());
        }

        url::Url::parse(&self.registry.upstream_url).map_err(|e| ConfigError::InvalidValue {
            key: "registry.upstream_url".to_string(),
            reason: e.to_string(),
        })?;

        if self.registry.test_command.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "registry.test_command".to_string(),
                reason: "must name at least the program to run".to_string(),
            }
            .into());
        }

        if self.plugin_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "plugin_name".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Built plugin assembly handed to the packaging script
    pub fn plugin_binary(&self) -> PathBuf {
        if let Some(path) = &self.package.plugin_binary {
            return path.clone();
        }
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("NINA")
            .join("Plugins")
            .join("3.0.0")
            .join("Advanced API")
            .join(format!("{}.dll", self.plugin_name))
    }

    /// Registry checkout location
    pub fn registry_dir(&self) -> PathBuf {
        self.project_dir.join(&self.registry.path)
    }

    /// Generated manifest location
    pub fn generated_manifest(&self) -> PathBuf {
        self.project_dir.join(&self.package.manifest_file)
    }

    /// OpenAPI document location
    pub fn spec_path(&self) -> PathBuf {
        self.project_dir.join(&self.docs.spec_file)
    }

    /// Env file location
    pub fn env_file(&self) -> PathBuf {
        self.project_dir.join(&self.docs.env_file)
    }
}

fn declares_project_dir(content: &str) -> bool {
    toml::from_str::<toml::Table>(content).is_ok_and(|table| table.contains_key("project_dir"))
}
