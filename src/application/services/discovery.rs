//! Descriptor discovery - validates module command specs into descriptors

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::{debug, info, warn};

use crate::application::errors::DiscoveryError;
use crate::domain::entities::{CommandSpec, Descriptor, ParamKind, SenderKind};
use crate::plugins::ModuleManager;

static COMMAND_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_\-]*$").expect("command name pattern is valid"));

/// A validated descriptor plus the names its module has switched off
#[derive(Debug, Clone)]
pub struct Discovered {
    pub descriptor: Descriptor,
    /// Lowercased names (canonical or alias) disabled for the owning module
    pub disabled_names: Vec<String>,
}

/// Walk every enabled module in registration order and validate its commands
pub fn discover(modules: &ModuleManager) -> Vec<Discovered> {
    let mut discovered = Vec::new();

    for entry in modules.entries() {
        let module_name = entry.module.name();
        if !entry.config.enabled {
            info!("Module '{}' is disabled, skipping its commands", module_name);
            continue;
        }

        let prefix = entry.permission_prefix();
        let disabled_names: Vec<String> = entry
            .config
            .disabled_commands
            .iter()
            .map(|c| c.trim().to_lowercase())
            .collect();

        let mut accepted = 0usize;
        for spec in entry.module.commands() {
            match validate(spec, module_name, &prefix) {
                Ok(descriptor) => {
                    accepted += 1;
                    discovered.push(Discovered {
                        descriptor,
                        disabled_names: disabled_names.clone(),
                    });
                }
                Err(e) => warn!("failed to register command in module '{}': {}", module_name, e),
            }
        }
        debug!("Module '{}' contributed {} command shapes", module_name, accepted);
    }

    discovered
}

/// Turn one declared spec into a descriptor, or explain why it can't be used
pub fn validate(spec: CommandSpec, module: &str, permission_prefix: &str) -> Result<Descriptor, DiscoveryError> {
    let name = spec.name.trim().to_lowercase();
    if !COMMAND_NAME.is_match(&name) {
        return Err(DiscoveryError::InvalidName(spec.name));
    }

    let handler = spec
        .handler
        .ok_or_else(|| DiscoveryError::MissingHandler(name.clone()))?;

    if let Some(param) = spec.unsupported_params.first() {
        return Err(DiscoveryError::UnsupportedParameter {
            command: name,
            param: param.clone(),
        });
    }

    if let Some(pos) = spec.params.iter().position(|p| *p == ParamKind::StringTail) {
        if pos + 1 != spec.params.len() {
            return Err(DiscoveryError::TailNotLast(name));
        }
    }

    let sender = match (spec.player_only, spec.console_only) {
        (true, true) => return Err(DiscoveryError::ConflictingSenderKinds(name)),
        (true, false) => SenderKind::PlayerOnly,
        (false, true) => SenderKind::ConsoleOnly,
        (false, false) => SenderKind::Any,
    };

    let mut aliases: Vec<String> = Vec::with_capacity(spec.aliases.len());
    for alias in &spec.aliases {
        let alias = alias.trim().to_lowercase();
        if !COMMAND_NAME.is_match(&alias) {
            return Err(DiscoveryError::InvalidAlias {
                command: name,
                alias,
            });
        }
        if alias == name || aliases.contains(&alias) {
            continue;
        }
        aliases.push(alias);
    }

    let mut permissions: Vec<String> = Vec::with_capacity(spec.permissions.len());
    for suffix in &spec.permissions {
        let qualified = qualify_permission(permission_prefix, suffix);
        if !permissions.contains(&qualified) {
            permissions.push(qualified);
        }
    }

    Ok(Descriptor {
        module: module.to_string(),
        name,
        aliases,
        description: spec.description,
        arguments: spec.arguments,
        sender,
        params: spec.params,
        permissions,
        handler,
    })
}

fn qualify_permission(prefix: &str, suffix: &str) -> String {
    let suffix = suffix.trim();
    if prefix.is_empty() {
        suffix.to_string()
    } else {
        format!("{}.{}", prefix, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_spec(name: &str) -> CommandSpec {
        CommandSpec::new(name).with_handler(|_, _| Ok(true))
    }

    #[test]
    fn valid_spec_becomes_descriptor() {
        let spec = ok_spec("Slap")
            .with_aliases(["SMACK", "slap", "smack"])
            .with_permission("slap")
            .with_permission("slap")
            .with_param(ParamKind::String);

        let descriptor = validate(spec, "fun", "fun").unwrap();
        assert_eq!(descriptor.name, "slap");
        assert_eq!(descriptor.aliases, vec!["smack".to_string()]);
        assert_eq!(descriptor.permissions, vec!["fun.slap".to_string()]);
        assert_eq!(descriptor.sender, SenderKind::Any);
        assert_eq!(descriptor.module, "fun");
    }

    #[test]
    fn rejects_both_sender_flags() {
        let spec = ok_spec("stop").player_only().console_only();
        assert_eq!(
            validate(spec, "core", "core").unwrap_err(),
            DiscoveryError::ConflictingSenderKinds("stop".into())
        );
    }

    #[test]
    fn rejects_tail_before_last_slot() {
        let spec = ok_spec("mail")
            .with_param(ParamKind::StringTail)
            .with_param(ParamKind::String);
        assert_eq!(
            validate(spec, "mail", "mail").unwrap_err(),
            DiscoveryError::TailNotLast("mail".into())
        );
    }

    #[test]
    fn rejects_unknown_parameter_types() {
        let spec = ok_spec("tp").with_signature("string location");
        assert!(matches!(
            validate(spec, "tp", "tp"),
            Err(DiscoveryError::UnsupportedParameter { param, .. }) if param == "location"
        ));
    }

    #[test]
    fn rejects_missing_handler_and_bad_names() {
        assert_eq!(
            validate(CommandSpec::new("noop"), "m", "m").unwrap_err(),
            DiscoveryError::MissingHandler("noop".into())
        );
        assert!(matches!(
            validate(ok_spec(""), "m", "m"),
            Err(DiscoveryError::InvalidName(_))
        ));
        assert!(matches!(
            validate(ok_spec("has space"), "m", "m"),
            Err(DiscoveryError::InvalidName(_))
        ));
        assert!(matches!(
            validate(ok_spec("ok").with_aliases(["bad alias"]), "m", "m"),
            Err(DiscoveryError::InvalidAlias { .. })
        ));
    }

    #[test]
    fn empty_prefix_keeps_suffix_as_is() {
        let spec = ok_spec("motd").with_permission("server.motd");
        let descriptor = validate(spec, "core", "").unwrap();
        assert_eq!(descriptor.permissions, vec!["server.motd".to_string()]);
    }
}
