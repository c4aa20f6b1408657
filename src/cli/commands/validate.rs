//! Validate command execution.

use crate::cli::RuntimeConfig;
use crate::config::Settings;
use crate::docs::validate_spec_file;
use crate::error::{ReleaseError, Result};
use std::path::Path;

/// Execute validate command
pub(super) fn execute_validate(
    spec: Option<&Path>,
    settings: &Settings,
    config: &RuntimeConfig,
) -> Result<i32> {
    let path = spec
        .map(Path::to_path_buf)
        .unwrap_or_else(|| settings.spec_path());

    match validate_spec_file(&path) {
        Ok(summary) => {
            config.success_println(&format!("{} is valid", path.display()));
            config.indent(&format!("OpenAPI {}", summary.openapi));
            config.indent(&format!("{} {}", summary.title, summary.version));
            config.indent(&format!("{} operation(s)", summary.operations));
            Ok(0)
        }
        Err(ReleaseError::Spec(e)) => {
            config.error_println(&e.to_string());
            Ok(1)
        }
        Err(e) => Err(e),
    }
}
