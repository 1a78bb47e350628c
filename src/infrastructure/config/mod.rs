//! Configuration management

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::application::errors::ConfigError;
use crate::application::messaging::Messages;
use crate::plugins::{ModuleConfig, ModuleManager};

/// Engine configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub server: ServerConfig,
    pub messages: Messages,
    /// Per-module switches keyed by module name
    pub modules: HashMap<String, ModuleConfig>,
    pub fun: FunConfig,
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServerConfig {
    pub name: String,
    pub prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "commandeer".to_string(),
            prefix: "/".to_string(),
        }
    }
}

/// Settings for the fun module
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FunConfig {
    /// Tell bystanders who got slapped, rocketed or set on fire
    pub broadcast: bool,
    /// Individual broadcasts before collapsing into "and many more"
    pub broadcast_limit: usize,
    pub fire_ticks: u32,
    pub rocket_velocity: f64,
}

impl Default for FunConfig {
    fn default() -> Self {
        Self {
            broadcast: true,
            broadcast_limit: 6,
            fire_ticks: 240,
            rocket_velocity: 4.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConsoleConfig {
    /// Print deliveries to stdout as they happen
    pub echo: bool,
    /// Players online when the console host starts
    pub players: Vec<PlayerConfig>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            echo: true,
            players: vec![
                PlayerConfig {
                    name: "alice".to_string(),
                    permissions: vec!["fun.*".to_string(), "utility.broadcast".to_string()],
                },
                PlayerConfig {
                    name: "bob".to_string(),
                    permissions: vec!["utility.heal.self".to_string()],
                },
            ],
        }
    }
}

/// A demo player and the permissions it holds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlayerConfig {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// `COMMANDEER_PREFIX` replaces the command prefix; `COMMANDEER_DISABLED`
    /// is a comma separated list of modules to switch off
    pub fn apply_env(&mut self) {
        if let Ok(prefix) = std::env::var("COMMANDEER_PREFIX") {
            self.server.prefix = prefix;
        }

        if let Ok(disabled) = std::env::var("COMMANDEER_DISABLED") {
            self.disable_modules(disabled.split(','));
        }
    }

    pub fn disable_modules<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names.into_iter().map(str::trim).filter(|n| !n.is_empty()) {
            self.modules.entry(name.to_lowercase()).or_default().enabled = false;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidValue(format!(
                "server.prefix '{}' must not contain whitespace",
                self.server.prefix
            )));
        }
        if !self.fun.rocket_velocity.is_finite() {
            return Err(ConfigError::InvalidValue(
                "fun.rocket-velocity must be a finite number".to_string(),
            ));
        }
        for player in &self.console.players {
            if player.name.trim().is_empty() || player.name.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidValue(format!(
                    "console player name '{}' is not usable",
                    player.name
                )));
            }
        }
        Ok(())
    }

    /// Push the `modules` section into a module manager
    pub fn apply_modules(&self, modules: &mut ModuleManager) {
        modules.apply_config(&self.modules);
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
