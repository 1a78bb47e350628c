use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::command_table::{uninstall, CommandTable};
use super::discovery;
use crate::application::messaging::{CommandParser, DispatchOutcome, Dispatcher, Messages};
use crate::domain::entities::{CommandInfo, CommandLine, Principal};
use crate::domain::traits::{CommandHost, Messenger, PermissionProvider};
use crate::plugins::ModuleManager;

/// Summary of a load pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Descriptors that passed validation
    pub discovered: usize,
    /// Descriptors that made it into the table
    pub registered: usize,
    /// Names installed with the host
    pub installed: usize,
}

/// Service for loading modules' commands and dispatching command lines
///
/// Owns the dispatcher; reloading needs `&mut self`, so it can't overlap a
/// dispatch made through this service.
pub struct CommandService {
    host: Arc<dyn CommandHost>,
    permissions: Arc<dyn PermissionProvider>,
    messenger: Arc<dyn Messenger>,
    messages: Messages,
    parser: CommandParser,
    dispatcher: Arc<Dispatcher>,
    installed: Vec<String>,
}

impl CommandService {
    pub fn new(
        host: Arc<dyn CommandHost>,
        permissions: Arc<dyn PermissionProvider>,
        messenger: Arc<dyn Messenger>,
        messages: Messages,
    ) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(
            CommandTable::new(),
            permissions.clone(),
            messenger.clone(),
            messages.clone(),
        ));
        Self {
            host,
            permissions,
            messenger,
            messages,
            parser: CommandParser::default(),
            dispatcher,
            installed: Vec::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.parser = CommandParser::new(prefix);
        self
    }

    /// Replace the user-facing texts; takes effect on the next load
    pub fn set_messages(&mut self, messages: Messages) {
        self.messages = messages;
    }

    /// Discover every enabled module's commands, build the table and install it
    pub fn load(&mut self, modules: &ModuleManager) -> LoadReport {
        if !self.installed.is_empty() {
            self.unload();
        }

        let discovered = discovery::discover(modules);
        let found = discovered.len();
        let table = CommandTable::build(discovered);
        let registered = table.len();

        let dispatcher = Arc::new(Dispatcher::new(
            table,
            self.permissions.clone(),
            self.messenger.clone(),
            self.messages.clone(),
        ));
        self.installed = dispatcher
            .table()
            .install(self.host.as_ref(), dispatcher.clone());
        self.dispatcher = dispatcher;

        let report = LoadReport {
            discovered: found,
            registered,
            installed: self.installed.len(),
        };
        info!(
            "Loaded {} command shapes ({} rejected) under {} names",
            report.registered,
            report.discovered - report.registered,
            report.installed
        );
        report
    }

    /// Drop the current table and load again from `modules`
    pub fn reload(&mut self, modules: &ModuleManager) -> LoadReport {
        info!("Reloading commands");
        self.unload();
        self.load(modules)
    }

    /// Remove every installed name from the host and clear the table
    pub fn unload(&mut self) {
        uninstall(self.host.as_ref(), &self.installed);
        self.installed.clear();
        self.dispatcher = Arc::new(Dispatcher::new(
            CommandTable::new(),
            self.permissions.clone(),
            self.messenger.clone(),
            self.messages.clone(),
        ));
    }

    pub fn dispatch(&self, principal: &Principal, line: &CommandLine) -> DispatchOutcome {
        self.dispatcher.dispatch(principal, line)
    }

    /// Parse `text` and dispatch it; blank input counts as an invalid command
    pub fn dispatch_text(&self, principal: &Principal, text: &str) -> DispatchOutcome {
        match self.parser.parse(text) {
            Some(line) => self.dispatch(principal, &line),
            None => {
                let message = self.messages.invalid_command.clone();
                self.messenger.send(principal, &message);
                DispatchOutcome::NoMatch(message)
            }
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn table(&self) -> &CommandTable {
        self.dispatcher.table()
    }

    pub fn installed(&self) -> &[String] {
        &self.installed
    }

    pub fn prefix(&self) -> &str {
        self.parser.prefix()
    }

    /// Every registered shape, grouped by name in registration order
    pub fn list(&self) -> Vec<CommandInfo> {
        let table = self.table();
        table
            .descriptors()
            .map(|d| {
                let mut info = d.info();
                info.aliases = table.aliases_of(&d.name).into_iter().map(str::to_string).collect();
                info
            })
            .collect()
    }

    pub fn get_help(&self, command: Option<&str>) -> String {
        let table = self.table();

        if let Some(name) = command {
            let name = name.trim_start_matches('/').to_lowercase();
            let canonical = table.resolve(&name);
            let candidates = table.candidates(canonical);
            if candidates.is_empty() {
                return format!("Command /{} not found", name);
            }

            let mut help = String::new();
            for descriptor in candidates {
                help.push_str(&format!(
                    "{} - {}\n",
                    descriptor.usage(),
                    descriptor.description.as_deref().unwrap_or("No description")
                ));
            }
            let aliases = table.aliases_of(canonical);
            if !aliases.is_empty() {
                help.push_str(&format!("Aliases: {}\n", aliases.join(", ")));
            }
            return help.trim_end().to_string();
        }

        // List all commands
        let mut help = "Available commands:\n".to_string();
        for descriptor in table.descriptors() {
            if !table.is_active(&descriptor.name) && table.aliases_of(&descriptor.name).is_empty() {
                continue;
            }
            help.push_str(&format!(
                "  {} - {}\n",
                descriptor.usage(),
                descriptor.description.as_deref().unwrap_or("")
            ));
        }
        help
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::HostError;
    use crate::domain::entities::{CommandSpec, ParamKind};
    use crate::domain::traits::CommandExecutor;
    use crate::plugins::{Module, ModuleConfig};
    use std::collections::HashMap;
    use std::sync::RwLock;

    #[derive(Default)]
    struct Map(RwLock<HashMap<String, Arc<dyn CommandExecutor>>>);

    impl CommandHost for Map {
        fn register(&self, name: &str, executor: Arc<dyn CommandExecutor>) -> Result<(), HostError> {
            self.0.write().unwrap().insert(name.to_string(), executor);
            Ok(())
        }

        fn unregister(&self, name: &str) -> Result<(), HostError> {
            self.0
                .write()
                .unwrap()
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| HostError::NotRegistered(name.to_string()))
        }

        fn lookup(&self, name: &str) -> Option<Arc<dyn CommandExecutor>> {
            self.0.read().unwrap().get(name).cloned()
        }
    }

    struct Silent;

    impl Messenger for Silent {
        fn send(&self, _principal: &Principal, _text: &str) {}
    }

    impl PermissionProvider for Silent {
        fn has_permission(&self, _principal: &Principal, _permission: &str) -> bool {
            false
        }
    }

    struct Greeter;

    impl Module for Greeter {
        fn name(&self) -> &str {
            "greeter"
        }

        fn description(&self) -> &str {
            "says hello"
        }

        fn commands(&self) -> Vec<CommandSpec> {
            vec![
                CommandSpec::new("hello")
                    .with_aliases(["hi", "hey"])
                    .with_description("Say hello")
                    .with_param(ParamKind::StringTail)
                    .with_handler(|_, _| Ok(true)),
                CommandSpec::new("wave").with_handler(|_, _| Ok(true)),
            ]
        }
    }

    fn service(host: Arc<Map>) -> CommandService {
        CommandService::new(host, Arc::new(Silent), Arc::new(Silent), Messages::default())
    }

    #[test]
    fn load_installs_names_and_reload_cleans_up() {
        let host = Arc::new(Map::default());
        let mut modules = ModuleManager::new();
        modules.register(Greeter).unwrap();

        let mut commands = service(host.clone());
        let report = commands.load(&modules);
        assert_eq!(report, LoadReport { discovered: 2, registered: 2, installed: 4 });
        assert!(host.lookup("hey").is_some());

        modules
            .configure("greeter", ModuleConfig::default().with_disabled_commands(["HEY", "wave"]))
            .unwrap();
        let report = commands.reload(&modules);
        assert_eq!(report.installed, 2);
        assert!(host.lookup("hey").is_none());
        assert!(host.lookup("wave").is_none());
        assert!(host.lookup("hi").is_some());

        commands.unload();
        assert!(host.lookup("hello").is_none());
        assert!(commands.table().is_empty());
    }

    #[test]
    fn host_routes_into_the_dispatcher() {
        let host = Arc::new(Map::default());
        let mut modules = ModuleManager::new();
        modules.register(Greeter).unwrap();
        let mut commands = service(host.clone());
        commands.load(&modules);

        let executor = host.lookup("hi").unwrap();
        assert!(executor.execute(&Principal::player("alice"), "hi", &["there".to_string()]));
    }

    #[test]
    fn help_lists_usage_and_aliases() {
        let host = Arc::new(Map::default());
        let mut modules = ModuleManager::new();
        modules.register(Greeter).unwrap();
        let mut commands = service(host);
        commands.load(&modules);

        let help = commands.get_help(Some("/hi"));
        assert!(help.contains("/hello <string...> - Say hello"));
        assert!(help.contains("Aliases: hey, hi"));
        assert_eq!(commands.get_help(Some("nope")), "Command /nope not found");
        assert!(commands.get_help(None).contains("/wave"));

        let listed = commands.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].aliases, vec!["hey".to_string(), "hi".to_string()]);
    }

    #[test]
    fn blank_text_is_invalid() {
        let commands = service(Arc::new(Map::default()));
        assert!(matches!(
            commands.dispatch_text(&Principal::console(), "   "),
            DispatchOutcome::NoMatch(_)
        ));
    }
}
