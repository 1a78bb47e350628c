//! Module trait definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::entities::CommandSpec;

/// A feature module contributing commands
///
/// Modules list their commands explicitly; nothing is discovered by
/// introspection.
pub trait Module: Send + Sync {
    /// Unique identifier for the module
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// Prefix qualifying this module's permission suffixes
    fn permission_prefix(&self) -> &str {
        self.name()
    }

    /// Every command shape this module offers
    fn commands(&self) -> Vec<CommandSpec>;

    /// Optional: module metadata for listings
    fn metadata(&self) -> HashMap<String, String> {
        HashMap::new()
    }
}

/// Per-module switches, usually loaded from config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ModuleConfig {
    pub enabled: bool,
    /// Command names or aliases not to install (case-insensitive)
    pub disabled_commands: Vec<String>,
    /// Overrides the module's own permission prefix
    pub permission_prefix: Option<String>,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled_commands: Vec::new(),
            permission_prefix: None,
        }
    }
}

impl ModuleConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_disabled_commands<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_commands = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_permission_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.permission_prefix = Some(prefix.into());
        self
    }
}
