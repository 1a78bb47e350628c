//! Command table - descriptors keyed by signature, alias map, active names

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{debug, warn};

use super::discovery::Discovered;
use crate::domain::entities::{Descriptor, SignatureKey};
use crate::domain::traits::{CommandExecutor, CommandHost};

/// Registry of every accepted command shape
///
/// Built once per load and read-only afterwards.
#[derive(Debug, Default)]
pub struct CommandTable {
    descriptors: HashMap<SignatureKey, Descriptor>,
    /// Signature keys per canonical name, in registration order
    by_name: HashMap<String, Vec<SignatureKey>>,
    /// Canonical names in first-registration order
    order: Vec<String>,
    aliases: HashMap<String, String>,
    active_names: BTreeSet<String>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from discovered descriptors, applying the collision policy
    pub fn build(discovered: impl IntoIterator<Item = Discovered>) -> Self {
        let mut table = Self::new();
        for entry in discovered {
            table.insert(entry);
        }
        table
    }

    /// Insert one descriptor; returns false if it was rejected
    pub fn insert(&mut self, entry: Discovered) -> bool {
        let Discovered {
            descriptor,
            disabled_names,
        } = entry;
        let key = descriptor.signature();

        if let Some(existing) = self.descriptors.get(&key) {
            warn!(
                "failed to register command: {} (same shape already registered by module '{}')",
                key, existing.module
            );
            return false;
        }

        if let Some(owner) = self.aliases.get(&descriptor.name) {
            warn!(
                "failed to register command: {} ('{}' is already an alias of '{}')",
                key, descriptor.name, owner
            );
            return false;
        }

        let name = descriptor.name.clone();
        let is_disabled = |n: &str| disabled_names.iter().any(|d| d == n);

        if is_disabled(&name) {
            debug!("Command '{}' disabled for module '{}'", name, descriptor.module);
        } else {
            self.active_names.insert(name.clone());
        }

        for alias in &descriptor.aliases {
            if is_disabled(alias) {
                debug!("Alias '{}' for '{}' disabled", alias, name);
                continue;
            }
            if self.by_name.contains_key(alias) {
                warn!(
                    "Alias '{}' for '{}' collides with an existing command, skipping",
                    alias, name
                );
                continue;
            }
            match self.aliases.get(alias) {
                Some(owner) if owner != &name => {
                    warn!(
                        "Alias '{}' for '{}' is already used by '{}', skipping",
                        alias, name, owner
                    );
                    continue;
                }
                Some(_) => {}
                None => {
                    self.aliases.insert(alias.clone(), name.clone());
                }
            }
            self.active_names.insert(alias.clone());
        }

        if !self.by_name.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.by_name.entry(name).or_default().push(key.clone());
        self.descriptors.insert(key, descriptor);
        true
    }

    /// Map an alias to its canonical name; anything else is returned unchanged
    pub fn resolve<'a>(&'a self, label: &'a str) -> &'a str {
        self.aliases.get(label).map(String::as_str).unwrap_or(label)
    }

    /// Every overload of a canonical name, in registration order
    pub fn candidates(&self, canonical: &str) -> Vec<&Descriptor> {
        self.by_name
            .get(canonical)
            .map(|keys| keys.iter().filter_map(|k| self.descriptors.get(k)).collect())
            .unwrap_or_default()
    }

    pub fn get(&self, key: &SignatureKey) -> Option<&Descriptor> {
        self.descriptors.get(key)
    }

    /// All descriptors, grouped by canonical name in registration order
    pub fn descriptors(&self) -> impl Iterator<Item = &Descriptor> {
        self.order.iter().flat_map(move |name| self.candidates(name))
    }

    /// Installed aliases of a canonical name, sorted
    pub fn aliases_of(&self, canonical: &str) -> Vec<&str> {
        let mut aliases: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(alias, owner)| owner.as_str() == canonical && self.active_names.contains(*alias))
            .map(|(alias, _)| alias.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }

    pub fn active_names(&self) -> &BTreeSet<String> {
        &self.active_names
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active_names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Install `executor` under every active name, evicting whatever the host had there
    pub fn install(&self, host: &dyn CommandHost, executor: Arc<dyn CommandExecutor>) -> Vec<String> {
        let mut installed = Vec::with_capacity(self.active_names.len());
        for name in &self.active_names {
            if host.lookup(name).is_some() {
                warn!("Overwriting command '{}'!", name);
                if let Err(e) = host.unregister(name) {
                    warn!("Failed to unregister existing command '{}': {}", name, e);
                }
            }
            match host.register(name, executor.clone()) {
                Ok(()) => installed.push(name.clone()),
                Err(e) => warn!("Failed to register command '{}' with host: {}", name, e),
            }
        }
        installed
    }
}

/// Remove previously installed names from the host
pub fn uninstall(host: &dyn CommandHost, names: &[String]) {
    for name in names {
        if let Err(e) = host.unregister(name) {
            debug!("Command '{}' was already gone from host: {}", name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::discovery::validate;
    use crate::domain::entities::{CommandSpec, ParamKind, SenderKind};

    fn entry(spec: CommandSpec, module: &str, disabled: &[&str]) -> Discovered {
        let spec = spec.with_handler(|_, _| Ok(true));
        Discovered {
            descriptor: validate(spec, module, module).unwrap(),
            disabled_names: disabled.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn overloads_coexist_and_keep_registration_order() {
        let table = CommandTable::build(vec![
            entry(CommandSpec::new("whoami").console_only(), "util", &[]),
            entry(CommandSpec::new("whoami").player_only(), "util", &[]),
            entry(CommandSpec::new("whoami").with_param(ParamKind::String), "util", &[]),
        ]);
        let senders: Vec<SenderKind> = table.candidates("whoami").iter().map(|d| d.sender).collect();
        assert_eq!(senders, vec![SenderKind::ConsoleOnly, SenderKind::PlayerOnly, SenderKind::Any]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn identical_signature_first_wins() {
        let mut table = CommandTable::new();
        assert!(table.insert(entry(CommandSpec::new("heal"), "first", &[])));
        assert!(!table.insert(entry(CommandSpec::new("heal"), "second", &[])));
        assert_eq!(table.candidates("heal")[0].module, "first");
    }

    #[test]
    fn alias_collisions_are_skipped() {
        let table = CommandTable::build(vec![
            entry(CommandSpec::new("slap").with_aliases(["smack"]), "fun", &[]),
            entry(CommandSpec::new("punch").with_aliases(["smack", "slap", "hit"]), "fight", &[]),
        ]);
        assert_eq!(table.resolve("smack"), "slap");
        assert_eq!(table.resolve("hit"), "punch");
        assert_eq!(table.resolve("slap"), "slap");
        assert_eq!(table.aliases_of("punch"), vec!["hit"]);
    }

    #[test]
    fn canonical_name_taken_as_alias_is_rejected() {
        let mut table = CommandTable::new();
        assert!(table.insert(entry(CommandSpec::new("broadcast").with_aliases(["bc"]), "util", &[])));
        assert!(!table.insert(entry(CommandSpec::new("bc"), "other", &[])));
        assert!(table.candidates("bc").is_empty());
    }

    #[test]
    fn disabled_names_stay_out_of_active_set() {
        let table = CommandTable::build(vec![entry(
            CommandSpec::new("rocket").with_aliases(["launch", "yeet"]),
            "fun",
            &["yeet"],
        )]);
        assert!(table.is_active("rocket"));
        assert!(table.is_active("launch"));
        assert!(!table.is_active("yeet"));
        assert_eq!(table.resolve("yeet"), "yeet");
    }

    #[test]
    fn disabled_canonical_still_reachable_through_alias() {
        let table = CommandTable::build(vec![entry(
            CommandSpec::new("immolate").with_aliases(["burn"]),
            "fun",
            &["immolate"],
        )]);
        assert!(!table.is_active("immolate"));
        assert!(table.is_active("burn"));
        assert_eq!(table.candidates(table.resolve("burn")).len(), 1);
    }
}
