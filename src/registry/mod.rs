//! Manifest registry operations.
//!
//! The registry is a separate git checkout aggregating manifests of every
//! NINA plugin. A release pulls it from both remotes, drops the new manifest
//! into this plugin's folder, runs the registry's own manifest tests, then
//! commits and pushes.

mod placement;

pub use placement::{ManifestCheck, check_manifest, place_manifest};

use crate::config::Settings;
use crate::descriptor::ReleaseDescriptor;
use crate::process::CommandSpec;
use std::path::PathBuf;

/// Relative path of a release's manifest folder inside the registry
pub fn manifest_folder(settings: &Settings, descriptor: &ReleaseDescriptor) -> PathBuf {
    PathBuf::from(&settings.registry.manifest_root).join(descriptor.target_folder())
}

/// Pull the default remote, then the upstream registry
pub fn sync_commands(settings: &Settings) -> Vec<CommandSpec> {
    let registry = settings.registry_dir();
    vec![
        CommandSpec::new(&settings.programs.git, &registry).arg("pull"),
        CommandSpec::new(&settings.programs.git, &registry)
            .arg("pull")
            .arg(&settings.registry.upstream_url),
    ]
}

/// Registry manifest test run
pub fn test_command(settings: &Settings) -> CommandSpec {
    let mut parts = settings.registry.test_command.iter();
    let program = parts.next().map(String::as_str).unwrap_or("node");
    CommandSpec::new(program, settings.registry_dir()).args(parts.map(String::as_str))
}

/// Stage, commit and push the release's manifest folder
pub fn commit_commands(settings: &Settings, descriptor: &ReleaseDescriptor) -> Vec<CommandSpec> {
    let registry = settings.registry_dir();
    let folder = manifest_folder(settings, descriptor)
        .to_string_lossy()
        .replace('\\', "/");
    vec![
        CommandSpec::new(&settings.programs.git, &registry)
            .arg("add")
            .arg(folder),
        CommandSpec::new(&settings.programs.git, &registry)
            .args(["commit", "-m"])
            .arg(descriptor.commit_message(&settings.plugin_name)),
        CommandSpec::new(&settings.programs.git, &registry)
            .arg("push")
            .arg(&settings.registry.push_remote)
            .arg(&settings.registry.push_branch),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ReleaseChannel;

    fn descriptor() -> ReleaseDescriptor {
        ReleaseDescriptor::new("2.2.0.0", ReleaseChannel::Stable, "2.2.0.0", false).unwrap()
    }

    #[test]
    fn test_sync_pulls_both_remotes_in_registry() {
        let mut settings = Settings::default();
        settings.project_dir = "/work/ninaAPI/ninaAPI".into();
        let commands = sync_commands(&settings);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].display_line(), "git pull");
        assert_eq!(
            commands[1].display_line(),
            "git pull https://github.com/isbeorn/nina.plugin.manifests.git"
        );
        for command in &commands {
            assert_eq!(
                command.cwd(),
                std::path::Path::new("/work/ninaAPI/ninaAPI/../../nina.plugin.manifests")
            );
        }
    }

    #[test]
    fn test_commit_message_embeds_version() {
        let commands = commit_commands(&Settings::default(), &descriptor());
        assert_eq!(commands[0].display_line(), "git add manifests/n/ninaAPI/3.0.0/2.2.0.0");
        assert_eq!(
            commands[1].arg_after("-m"),
            Some("Added ninaAPI manifest for version 2.2.0.0")
        );
        assert_eq!(commands[2].display_line(), "git push origin main");
    }

    #[test]
    fn test_manifest_test_command() {
        let command = test_command(&Settings::default());
        assert_eq!(command.display_line(), "node gather");
    }
}
