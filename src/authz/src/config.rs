//! Registry and resolver configuration
//!
//! Every field has a default, so an empty document is a valid configuration:
//!
//! ```toml
//! [registry]
//! reject_conversion_cycles = false
//!
//! [resolver]
//! cycle_policy = "skip_candidate"
//! trace_all_kinds = false
//! ```

use crate::error::{AuthzError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What a collection check does when one held role hits a conversion cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Treat the offending role as not satisfying and keep checking the rest
    #[default]
    SkipCandidate,

    /// Abort the whole collection check with the cycle error
    AbortAll,
}

/// Registry build settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySection {
    /// Fail the build when the conversion graph contains a cycle
    pub reject_conversion_cycles: bool,
}

/// Resolver settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSection {
    /// Policy for cycles met during collection checks
    pub cycle_policy: CyclePolicy,

    /// Log every check at info level, not only checks of logging-enabled kinds
    pub trace_all_kinds: bool,
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub registry: RegistrySection,
    pub resolver: ResolverSection,
}

impl Config {
    /// Parse a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| AuthzError::Config(e.to_string()))
    }

    /// Load a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Render as a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| AuthzError::Config(e.to_string()))
    }
}
