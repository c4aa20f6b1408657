//! Plugin build and packaging commands.
//!
//! The build produces the plugin assembly; the packaging script turns it into
//! `manifest.json` plus the installer archive uploaded to the release.

use crate::config::Settings;
use crate::descriptor::ReleaseDescriptor;
use crate::process::CommandSpec;

/// `dotnet build` for the plugin project in Release/AnyCPU
pub fn build_command(settings: &Settings) -> CommandSpec {
    CommandSpec::new(&settings.programs.dotnet, &settings.project_dir)
        .arg("build")
        .arg(&settings.build.project_file)
        .arg("/property:GenerateFullPaths=true")
        .arg("/consoleloggerparameters:NoSummary")
        .arg(format!("/p:Configuration={}", settings.build.configuration))
        .arg(format!("/p:Platform={}", settings.build.platform))
}

/// Manifest generation script invocation.
///
/// Beta releases add `-beta`; the installer URL always points at the asset
/// the publish step uploads under this release's tag.
pub fn package_command(settings: &Settings, descriptor: &ReleaseDescriptor) -> CommandSpec {
    let installer_url = descriptor.installer_url(
        &settings.github.repository,
        &settings.package.archive_name,
    );

    let mut command = CommandSpec::new(&settings.programs.pwsh, &settings.project_dir)
        .arg(&settings.package.script)
        .arg("-file")
        .arg(settings.plugin_binary().to_string_lossy())
        .args(["-includeAll", "-createArchive"]);

    if descriptor.is_beta() {
        command = command.arg("-beta");
    }

    command.arg("-installerUrl").arg(installer_url)
}
