//! Module manager - holds feature modules in registration order

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::application::errors::EngineError;
use crate::plugins::trait_def::{Module, ModuleConfig};

/// A registered module and its switches
pub struct ModuleEntry {
    pub module: Arc<dyn Module>,
    pub config: ModuleConfig,
}

impl ModuleEntry {
    pub fn permission_prefix(&self) -> String {
        self.config
            .permission_prefix
            .clone()
            .unwrap_or_else(|| self.module.permission_prefix().to_string())
    }
}

/// Manages all modules; registration order is command registration order
#[derive(Default)]
pub struct ModuleManager {
    entries: Vec<ModuleEntry>,
}

impl ModuleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module with default switches
    pub fn register<M: Module + 'static>(&mut self, module: M) -> Result<(), EngineError> {
        self.register_with_config(Arc::new(module), ModuleConfig::default())
    }

    pub fn register_with_config(
        &mut self,
        module: Arc<dyn Module>,
        config: ModuleConfig,
    ) -> Result<(), EngineError> {
        let name = module.name().to_string();
        if self.has_module(&name) {
            return Err(EngineError::Module(format!("Module '{}' already registered", name)));
        }

        info!("Registering module: {}{}", name, if config.enabled { "" } else { " (disabled)" });
        self.entries.push(ModuleEntry { module, config });
        Ok(())
    }

    /// Unregister a module
    pub fn unregister(&mut self, name: &str) -> Result<(), EngineError> {
        let before = self.entries.len();
        self.entries.retain(|e| e.module.name() != name);
        if self.entries.len() == before {
            return Err(EngineError::Module(format!("Module '{}' not found", name)));
        }
        info!("Unregistered module: {}", name);
        Ok(())
    }

    /// Replace the switches of a registered module
    pub fn configure(&mut self, name: &str, config: ModuleConfig) -> Result<(), EngineError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.module.name() == name)
            .ok_or_else(|| EngineError::Module(format!("Module '{}' not found", name)))?;
        entry.config = config;
        Ok(())
    }

    /// Apply switches by module name; unknown names are ignored
    pub fn apply_config(&mut self, configs: &HashMap<String, ModuleConfig>) {
        for entry in &mut self.entries {
            if let Some(config) = configs.get(entry.module.name()) {
                entry.config = config.clone();
            }
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &ModuleEntry> {
        self.entries.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ModuleEntry> {
        self.entries.iter().find(|e| e.module.name() == name)
    }

    /// Check if a module exists
    pub fn has_module(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// List all registered modules
    pub fn list_modules(&self) -> Vec<ModuleInfo> {
        self.entries
            .iter()
            .map(|e| ModuleInfo {
                name: e.module.name().to_string(),
                description: e.module.description().to_string(),
                enabled: e.config.enabled,
                metadata: e.module.metadata(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Module information for listing
#[derive(Debug, Clone, Serialize)]
pub struct ModuleInfo {
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub metadata: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CommandSpec;

    struct Named(&'static str);

    impl Module for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "test module"
        }

        fn commands(&self) -> Vec<CommandSpec> {
            Vec::new()
        }
    }

    #[test]
    fn duplicate_names_are_refused() {
        let mut modules = ModuleManager::new();
        modules.register(Named("fun")).unwrap();
        assert!(modules.register(Named("fun")).is_err());
        assert_eq!(modules.len(), 1);
    }

    #[test]
    fn config_overrides_prefix_and_enabled() {
        let mut modules = ModuleManager::new();
        modules.register(Named("fun")).unwrap();
        modules.register(Named("utility")).unwrap();

        let mut configs = HashMap::new();
        configs.insert("fun".to_string(), ModuleConfig::default().with_permission_prefix("essentials.fun"));
        configs.insert("utility".to_string(), ModuleConfig::disabled());
        modules.apply_config(&configs);

        assert_eq!(modules.get("fun").unwrap().permission_prefix(), "essentials.fun");
        assert!(!modules.get("utility").unwrap().config.enabled);
        let names: Vec<String> = modules.list_modules().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["fun".to_string(), "utility".to_string()]);
    }

    #[test]
    fn unregister_unknown_fails() {
        let mut modules = ModuleManager::new();
        assert!(modules.unregister("ghost").is_err());
    }
}
