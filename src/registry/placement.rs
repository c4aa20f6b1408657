//! Copying the generated manifest into the registry checkout.

use super::manifest_folder;
use crate::config::Settings;
use crate::descriptor::ReleaseDescriptor;
use crate::error::{ManifestError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the manifest inside its registry folder
const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Copy the generated manifest to `{manifest_root}/{folder}/manifest.json`.
///
/// Missing directories are created; an existing manifest is overwritten.
/// Returns the destination path.
pub fn place_manifest(settings: &Settings, descriptor: &ReleaseDescriptor) -> Result<PathBuf> {
    let source = settings.generated_manifest();
    if !source.is_file() {
        return Err(ManifestError::SourceMissing { path: source }.into());
    }

    let registry = settings.registry_dir();
    if !registry.is_dir() {
        return Err(ManifestError::RegistryMissing { path: registry }.into());
    }

    let folder = registry.join(manifest_folder(settings, descriptor));
    std::fs::create_dir_all(&folder).map_err(|source| ManifestError::Filesystem {
        operation: "create",
        path: folder.clone(),
        source,
    })?;

    let destination = folder.join(MANIFEST_FILE_NAME);
    std::fs::copy(&source, &destination).map_err(|source| ManifestError::Filesystem {
        operation: "copy manifest to",
        path: destination.clone(),
        source,
    })?;

    log::debug!("Copied {} to {}", source.display(), destination.display());
    Ok(destination)
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ManifestView {
    version: Option<serde_json::Value>,
    installer: Option<InstallerView>,
}

#[derive(Deserialize)]
struct InstallerView {
    #[serde(rename = "URL")]
    url: Option<String>,
}

/// Findings of the post-copy manifest check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestCheck {
    /// Human-readable problems; empty when the manifest looks right
    pub warnings: Vec<String>,
}

impl ManifestCheck {
    /// Whether no problems were found
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Check a placed manifest against the release it is supposed to describe.
///
/// A manifest left over from an earlier packaging run points its installer
/// at another release's asset; that and a missing version are reported.
pub fn check_manifest(path: &Path, expected_installer_url: &str) -> Result<ManifestCheck> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Filesystem {
        operation: "read",
        path: path.to_path_buf(),
        source,
    })?;

    let mut check = ManifestCheck::default();
    let manifest: ManifestView = match serde_json::from_str(&content) {
        Ok(manifest) => manifest,
        Err(e) => {
            check
                .warnings
                .push(format!("{} is not valid manifest JSON: {}", path.display(), e));
            return Ok(check);
        }
    };

    if manifest.version.is_none() {
        check.warnings.push("manifest has no Version".to_string());
    }

    match manifest.installer.and_then(|i| i.url) {
        Some(url) if url == expected_installer_url => {}
        Some(url) => check.warnings.push(format!(
            "installer URL is {} but this release uploads {}",
            url, expected_installer_url
        )),
        None => check.warnings.push("manifest has no Installer.URL".to_string()),
    }

    Ok(check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ReleaseChannel;
    use crate::error::ReleaseError;

    const URL: &str = "https://github.com/christian-photo/ninaAPI/releases/download/2.2.0.0/ninaAPI.zip";

    fn workspace() -> (tempfile::TempDir, Settings) {
        let root = tempfile::tempdir().unwrap();
        let project = root.path().join("ninaAPI").join("ninaAPI");
        std::fs::create_dir_all(&project).unwrap();
        std::fs::create_dir_all(root.path().join("nina.plugin.manifests")).unwrap();
        let settings = Settings {
            project_dir: project,
            ..Settings::default()
        };
        (root, settings)
    }

    fn descriptor() -> ReleaseDescriptor {
        ReleaseDescriptor::new("2.2.0.0", ReleaseChannel::Stable, "2.2.0.0", false).unwrap()
    }

    #[test]
    fn test_place_creates_missing_directories() {
        let (root, settings) = workspace();
        std::fs::write(settings.generated_manifest(), "{\"Name\":\"Advanced API\"}").unwrap();

        let placed = place_manifest(&settings, &descriptor()).unwrap();

        let expected = root
            .path()
            .join("nina.plugin.manifests/manifests/n/ninaAPI/3.0.0/2.2.0.0/manifest.json");
        assert_eq!(placed.canonicalize().unwrap(), expected.canonicalize().unwrap());
        assert_eq!(
            std::fs::read_to_string(&placed).unwrap(),
            "{\"Name\":\"Advanced API\"}"
        );
    }

    #[test]
    fn test_place_overwrites_existing_manifest() {
        let (_root, settings) = workspace();
        std::fs::write(settings.generated_manifest(), "old").unwrap();
        place_manifest(&settings, &descriptor()).unwrap();

        std::fs::write(settings.generated_manifest(), "new").unwrap();
        let placed = place_manifest(&settings, &descriptor()).unwrap();
        assert_eq!(std::fs::read_to_string(placed).unwrap(), "new");
    }

    #[test]
    fn test_place_without_generated_manifest() {
        let (_root, settings) = workspace();
        assert!(matches!(
            place_manifest(&settings, &descriptor()),
            Err(ReleaseError::Manifest(ManifestError::SourceMissing { .. }))
        ));
    }

    #[test]
    fn test_place_without_registry_checkout() {
        let (root, settings) = workspace();
        std::fs::write(settings.generated_manifest(), "{}").unwrap();
        std::fs::remove_dir_all(root.path().join("nina.plugin.manifests")).unwrap();
        assert!(matches!(
            place_manifest(&settings, &descriptor()),
            Err(ReleaseError::Manifest(ManifestError::RegistryMissing { .. }))
        ));
    }

    #[test]
    fn test_check_matching_manifest_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(
            &path,
            format!(
                r#"{{"Version":{{"Major":"2"}},"Installer":{{"URL":"{}","Type":"ARCHIVE"}}}}"#,
                URL
            ),
        )
        .unwrap();
        assert!(check_manifest(&path, URL).unwrap().is_clean());
    }

    #[test]
    fn test_check_reports_stale_installer_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(
            &path,
            r#"{"Version":{},"Installer":{"URL":"https://github.com/christian-photo/ninaAPI/releases/download/2.1.0.0/ninaAPI.zip"}}"#,
        )
        .unwrap();
        let check = check_manifest(&path, URL).unwrap();
        assert_eq!(check.warnings.len(), 1);
        assert!(check.warnings[0].contains("2.1.0.0"));
    }

    #[test]
    fn test_check_reports_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(!check_manifest(&path, URL).unwrap().is_clean());
    }
}
