//! Environment lookup layered over an optional `.env` file.

use crate::error::{DocsError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Variables from a `.env` file with the process environment on top
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    file_vars: HashMap<String, String>,
    use_process_env: bool,
}

impl EnvConfig {
    /// Load `path` if it exists; process variables override file values
    pub fn load(path: &Path) -> Result<Self> {
        let mut file_vars = HashMap::new();

        if path.is_file() {
            let iter = dotenvy::from_path_iter(path).map_err(|e| DocsError::EnvFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            for item in iter {
                let (key, value) = item.map_err(|e| DocsError::EnvFile {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
                file_vars.insert(key, value);
            }
            log::debug!("Loaded {} variable(s) from {}", file_vars.len(), path.display());
        }

        Ok(Self {
            file_vars,
            use_process_env: true,
        })
    }

    /// Fixed variables only, ignoring the process environment
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            file_vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            use_process_env: false,
        }
    }

    /// Look up a non-empty variable
    pub fn get(&self, key: &str) -> Option<String> {
        let process = if self.use_process_env {
            std::env::var(key).ok()
        } else {
            None
        };
        process
            .or_else(|| self.file_vars.get(key).cloned())
            .filter(|value| !value.is_empty())
    }
}
