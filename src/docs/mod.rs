//! API documentation validation and deployment.

mod openapi;

pub use openapi::{SpecSummary, validate_spec, validate_spec_file};

use crate::config::Settings;
use crate::env::EnvConfig;
use crate::error::{DocsError, Result};
use crate::process::CommandSpec;

/// Deploy token for the documentation platform
pub fn load_token(settings: &Settings, env: &EnvConfig) -> Result<String> {
    env.get(&settings.docs.token_variable).ok_or_else(|| {
        DocsError::MissingToken {
            variable: settings.docs.token_variable.clone(),
        }
        .into()
    })
}

/// `bump deploy` of the OpenAPI document; the token is a secret argument
pub fn deploy_command(settings: &Settings, token: &str) -> CommandSpec {
    CommandSpec::new(&settings.programs.bump, &settings.project_dir)
        .arg("deploy")
        .arg("--doc")
        .arg(&settings.docs.doc_slug)
        .arg("--token")
        .secret_arg(token)
        .arg("--branch")
        .arg(&settings.docs.branch)
        .arg(&settings.docs.spec_file)
}
