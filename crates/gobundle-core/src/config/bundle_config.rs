//! Top-level gobundle configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{EntryConfig, ImportsConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`GOBUNDLE_*`)
/// 3. An explicitly named TOML file
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BundleConfig {
    pub entry: EntryConfig,
    pub imports: ImportsConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub entry_method: Option<String>,
    pub entry_required: Option<bool>,
}

impl BundleConfig {
    /// Load configuration with layered resolution.
    ///
    /// No file is read unless `config_file` names one; a named file that
    /// does not exist is an error.
    pub fn load(
        config_file: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_file {
            Self::merge_toml_file(&mut config, path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &BundleConfig) -> Result<(), ConfigError> {
        if let Some(ref method) = config.entry.method {
            if !is_identifier(method) {
                return Err(ConfigError::ValidationFailed {
                    field: "entry.method".to_string(),
                    message: format!("`{method}` is not a valid identifier"),
                });
            }
        }
        if let Some(ref function) = config.entry.function {
            if !is_identifier(function) {
                return Err(ConfigError::ValidationFailed {
                    field: "entry.function".to_string(),
                    message: format!("`{function}` is not a valid identifier"),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut BundleConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: BundleConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    fn merge(base: &mut BundleConfig, other: &BundleConfig) {
        // Entry
        if other.entry.method.is_some() {
            base.entry.method = other.entry.method.clone();
        }
        if other.entry.function.is_some() {
            base.entry.function = other.entry.function.clone();
        }
        if other.entry.required.is_some() {
            base.entry.required = other.entry.required;
        }

        // Imports
        if other.imports.drop_unused.is_some() {
            base.imports.drop_unused = other.imports.drop_unused;
        }
        if other.imports.add_missing.is_some() {
            base.imports.add_missing = other.imports.add_missing;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `GOBUNDLE_ENTRY_METHOD`, `GOBUNDLE_IMPORTS_DROP_UNUSED`, etc.
    fn apply_env_overrides(config: &mut BundleConfig) {
        if let Ok(val) = std::env::var("GOBUNDLE_ENTRY_METHOD") {
            config.entry.method = Some(val);
        }
        if let Ok(val) = std::env::var("GOBUNDLE_ENTRY_FUNCTION") {
            config.entry.function = Some(val);
        }
        if let Ok(val) = std::env::var("GOBUNDLE_ENTRY_REQUIRED") {
            if let Ok(v) = val.parse::<bool>() {
                config.entry.required = Some(v);
            }
        }
        if let Ok(val) = std::env::var("GOBUNDLE_IMPORTS_DROP_UNUSED") {
            if let Ok(v) = val.parse::<bool>() {
                config.imports.drop_unused = Some(v);
            }
        }
        if let Ok(val) = std::env::var("GOBUNDLE_IMPORTS_ADD_MISSING") {
            if let Ok(v) = val.parse::<bool>() {
                config.imports.add_missing = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut BundleConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.entry_method {
            config.entry.method = Some(v.clone());
        }
        if let Some(v) = cli.entry_required {
            config.entry.required = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Go identifier: a letter or `_`, then letters, digits or `_`.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}
