//! Registry configuration
//!
//! Loaded from TOML; every key is optional. Environment variables are
//! applied on top via [`RegistryConfig::apply_env_overrides`].
//!
//! ```toml
//! skip_verification = false
//! log_profile = "production"
//! hello_excludes_v1_1_modules = true
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::errors::{Result, SchemaError};
use crate::logging_facility::Profile;

/// Disables the consistency verifier when set to a truthy value
pub const ENV_SKIP_VERIFICATION: &str = "SCHEMAREG_SKIP_VERIFICATION";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Skip circular-leafref and unique-tag checks after composition
    pub skip_verification: bool,
    pub log_profile: Profile,
    /// Leave language version 1.1 modules out of hello capabilities
    pub hello_excludes_v1_1_modules: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            skip_verification: false,
            log_profile: Profile::Development,
            hello_excludes_v1_1_modules: true,
        }
    }
}

impl RegistryConfig {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// * `InvalidConfig` - malformed TOML, an unknown key or a wrongly typed value
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    ///
    /// Environment overrides are not applied here.
    ///
    /// # Errors
    ///
    /// * `InvalidConfig` - the file cannot be read, or its content is
    ///   rejected as by [`RegistryConfig::from_toml_str`]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| SchemaError::InvalidConfig {
            message: format!("failed to read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply overrides from the process environment
    ///
    /// # Errors
    ///
    /// * `InvalidConfig` - `SCHEMAREG_SKIP_VERIFICATION` is set to something
    ///   other than a boolean
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// * `InvalidConfig` - a looked-up value is not a boolean
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_SKIP_VERIFICATION) {
            self.skip_verification = parse_flag(ENV_SKIP_VERIFICATION, &raw)?;
        }
        Ok(())
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(SchemaError::InvalidConfig {
            message: format!("{} must be a boolean, got '{}'", key, other),
        }),
    }
}
