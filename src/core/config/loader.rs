#![allow(clippy::result_large_err)]

use super::{FlattenConfig, CONFIG_FILE_NAME};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::env;
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from workspace root (workspace/dtsx-flatten.toml)
    /// Environment variables override config file values
    /// A missing file yields defaults + env vars
    pub fn load_from_workspace(workspace_path: &Path) -> Result<FlattenConfig, AppError> {
        Self::load(&workspace_path.join(CONFIG_FILE_NAME))
    }

    /// Load config from an explicit path, then apply env overrides and validate.
    pub fn load(path: &Path) -> Result<FlattenConfig, AppError> {
        let mut config = Self::load_from_file(path)?.unwrap_or_default();
        Self::apply_env_overrides(&mut config)?;
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Load config from specific file path
    /// Returns Ok(None) if file doesn't exist
    pub fn load_from_file(path: &Path) -> Result<Option<FlattenConfig>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read config file {}: {}", path.display(), e),
            )
        })?;

        let config: FlattenConfig = toml::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::ConfigError,
                format!("Failed to parse config file {}: {}", path.display(), e),
            )
        })?;

        Ok(Some(config))
    }

    /// Environment variables take precedence over config file values
    fn apply_env_overrides(config: &mut FlattenConfig) -> Result<(), AppError> {
        if let Ok(dir) = env::var("DTSX_FLATTEN_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                config.output.dir = PathBuf::from(dir);
            }
        }

        if let Ok(format) = env::var("DTSX_FLATTEN_FORMAT") {
            config.output.format = format
                .parse()
                .map_err(|msg: String| AppError::new(ErrorCategory::ConfigError, msg))?;
        }

        if let Ok(extension) = env::var("DTSX_FLATTEN_EXTENSION") {
            config.discovery.extension = extension;
        }

        Ok(())
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "DTSX_FLATTEN_OUTPUT_DIR - Override output directory (default: dtsx-flatten-output)",
            "DTSX_FLATTEN_FORMAT - Override output format: csv or json (default: csv)",
            "DTSX_FLATTEN_EXTENSION - Override package file extension (default: dtsx)",
        ]
    }

    /// Validate configuration values
    pub fn validate_config(config: &FlattenConfig) -> Result<(), AppError> {
        let extension = config.discovery.extension.trim().trim_start_matches('.');
        if extension.is_empty() {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                "discovery.extension cannot be empty".to_string(),
            ));
        }

        if config.output.dir.as_os_str().is_empty() {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                "output.dir cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
