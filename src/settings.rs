// ABOUTME: Runtime settings for the fit binary, read from environment variables.
// ABOUTME: Command-line flags override whatever the environment provides.

use std::path::PathBuf;

use fit_store::FormatVersion;
use thiserror::Error;

pub const FILE_VAR: &str = "FIT_FILE";
pub const OUTPUT_VERSION_VAR: &str = "FIT_OUTPUT_VERSION";
pub const DEFAULT_FILE: &str = "todo.txt";

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("FIT_OUTPUT_VERSION must be 1 or 2, got {0:?}")]
    InvalidVersion(String),
}

/// Where the database lives and which format to write it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub file: PathBuf,
    pub output_version: Option<FormatVersion>,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// Environment variables:
    /// - FIT_FILE: database file (default: todo.txt)
    /// - FIT_OUTPUT_VERSION: format version to write, 1 or 2 (default: keep the file's version)
    pub fn from_env() -> Result<Self, SettingsError> {
        let file = std::env::var(FILE_VAR)
            .ok()
            .filter(|f| !f.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE));

        let output_version = match std::env::var(OUTPUT_VERSION_VAR).ok().filter(|v| !v.is_empty()) {
            None => None,
            Some(raw) => Some(
                raw.parse::<FormatVersion>()
                    .map_err(|_| SettingsError::InvalidVersion(raw))?,
            ),
        };

        Ok(Self {
            file,
            output_version,
        })
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, file: Option<PathBuf>, output_version: Option<FormatVersion>) -> Self {
        if let Some(file) = file {
            self.file = file;
        }
        if output_version.is_some() {
            self.output_version = output_version;
        }
        self
    }
}
