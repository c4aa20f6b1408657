//! GitHub release publishing through the `gh` CLI.

use crate::config::Settings;
use crate::descriptor::ReleaseDescriptor;
use crate::process::CommandSpec;

/// Options for one GitHub release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubReleaseOptions {
    /// Tag created for the release
    pub tag_name: String,
    /// Release title
    pub name: String,
    /// Whether the release is marked as a prerelease
    pub prerelease: bool,
    /// Repository slug (owner/repo)
    pub repository: String,
    /// Asset uploaded with the release
    pub asset: String,
}

impl GitHubReleaseOptions {
    /// Release options for a descriptor; beta releases are prereleases
    pub fn for_release(settings: &Settings, descriptor: &ReleaseDescriptor) -> Self {
        Self {
            tag_name: descriptor.release_tag(),
            name: descriptor.release_title(&settings.plugin_name),
            prerelease: descriptor.is_beta(),
            repository: settings.github.repository.clone(),
            asset: settings.package.archive_name.clone(),
        }
    }

    /// Release page URL
    pub fn html_url(&self) -> String {
        format!(
            "https://github.com/{}/releases/tag/{}",
            self.repository, self.tag_name
        )
    }
}

/// `gh release create` uploading the packaged archive
pub fn release_command(settings: &Settings, options: &GitHubReleaseOptions) -> CommandSpec {
    let mut command = CommandSpec::new(&settings.programs.gh, &settings.project_dir)
        .args(["release", "create"])
        .arg(&options.tag_name)
        .arg("-t")
        .arg(&options.name);

    if options.prerelease {
        command = command.arg("-p");
    }

    command.arg("-R").arg(&options.repository).arg(&options.asset)
}
