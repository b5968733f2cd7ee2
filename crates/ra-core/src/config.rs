//! Planner configuration and parsing for ra.yml

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::default_true;
use crate::symbol::{SymbolGenerator, DEFAULT_SYMBOL_PREFIX};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File names checked by [`PlannerConfig::load_from_dir`], in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["ra.yml", "ra.yaml"];

/// Options controlling how a statement program is turned into a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    /// Delete statements whose result is never read
    #[serde(default = "default_true")]
    pub dead_code_elimination: bool,

    /// Inline single-use statements into their consumer
    #[serde(default = "default_true")]
    pub chaining: bool,

    /// Prefix for generated result symbols
    #[serde(default = "default_symbol_prefix")]
    pub symbol_prefix: String,
}

fn default_symbol_prefix() -> String {
    DEFAULT_SYMBOL_PREFIX.to_string()
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            dead_code_elimination: true,
            chaining: true,
            symbol_prefix: default_symbol_prefix(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        // An empty document means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: PlannerConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `ra.yml` / `ra.yaml` from a directory, or defaults if neither exists
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.exists() {
                return Self::load(&candidate);
            }
        }
        log::debug!("No planner config in {}, using defaults", dir.display());
        Ok(Self::default())
    }

    /// Check field values
    pub fn validate(&self) -> CoreResult<()> {
        let prefix = &self.symbol_prefix;
        let valid = prefix
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "symbol_prefix '{prefix}' must be a non-empty identifier (letters, digits, '_')"
                ),
            });
        }
        Ok(())
    }

    /// Symbol generator using the configured prefix
    pub fn symbol_generator(&self) -> SymbolGenerator {
        SymbolGenerator::with_prefix(self.symbol_prefix.clone())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
