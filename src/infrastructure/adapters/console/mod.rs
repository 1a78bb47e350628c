//! Console host for development/testing
//!
//! Stands in for a game server: a command map the engine installs into, a
//! permission table, a messenger that records what each principal was told,
//! and an in-memory world.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;

use crate::application::errors::HostError;
use crate::application::messaging::CommandParser;
use crate::domain::entities::Principal;
use crate::domain::traits::{CommandExecutor, CommandHost, Messenger, PermissionProvider};
use crate::infrastructure::config::Config;
use crate::infrastructure::world::InMemoryWorld;

const UNKNOWN_COMMAND: &str = "Unknown command. Type \"/help\" for help.";

static COLOUR_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&[0-9a-fk-orA-FK-OR]").expect("colour code pattern is valid"));

/// Remove `&`-style colour codes for plain terminal output
pub fn strip_colours(text: &str) -> String {
    COLOUR_CODE.replace_all(text, "").into_owned()
}

/// Name → executor map, one executor per name
#[derive(Default)]
pub struct CommandMap {
    commands: RwLock<HashMap<String, Arc<dyn CommandExecutor>>>,
}

impl CommandMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every registered name, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .commands
            .read()
            .ok()
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl CommandHost for CommandMap {
    fn register(&self, name: &str, executor: Arc<dyn CommandExecutor>) -> Result<(), HostError> {
        let mut commands = self
            .commands
            .write()
            .map_err(|e| HostError::Internal(e.to_string()))?;
        commands.insert(name.to_lowercase(), executor);
        Ok(())
    }

    fn unregister(&self, name: &str) -> Result<(), HostError> {
        let mut commands = self
            .commands
            .write()
            .map_err(|e| HostError::Internal(e.to_string()))?;
        commands
            .remove(&name.to_lowercase())
            .map(|_| ())
            .ok_or_else(|| HostError::NotRegistered(name.to_string()))
    }

    fn lookup(&self, name: &str) -> Option<Arc<dyn CommandExecutor>> {
        self.commands.read().ok()?.get(&name.to_lowercase()).cloned()
    }
}

/// Host built-in that always answers with the same text
pub struct StaticReply {
    text: String,
    messenger: Arc<dyn Messenger>,
}

impl StaticReply {
    pub fn new(text: impl Into<String>, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            text: text.into(),
            messenger,
        }
    }
}

impl CommandExecutor for StaticReply {
    fn execute(&self, sender: &Principal, _label: &str, _args: &[String]) -> bool {
        self.messenger.send(sender, &self.text);
        true
    }
}

/// Per-player permission grants
///
/// The console holds every permission. A grant of `*` covers everything and
/// `fun.*` covers `fun.slap`, `fun.rocket.far` and so on.
#[derive(Default)]
pub struct PermissionTable {
    grants: RwLock<HashMap<String, BTreeSet<String>>>,
}

impl PermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, player: &str, permission: impl Into<String>) {
        if let Ok(mut grants) = self.grants.write() {
            grants
                .entry(player.to_lowercase())
                .or_default()
                .insert(permission.into().to_lowercase());
        }
    }

    pub fn revoke(&self, player: &str, permission: &str) -> bool {
        self.grants
            .write()
            .ok()
            .and_then(|mut g| g.get_mut(&player.to_lowercase()).map(|set| set.remove(&permission.to_lowercase())))
            .unwrap_or(false)
    }

    pub fn granted(&self, player: &str) -> Vec<String> {
        self.grants
            .read()
            .ok()
            .and_then(|g| g.get(&player.to_lowercase()).map(|set| set.iter().cloned().collect()))
            .unwrap_or_default()
    }
}

impl PermissionProvider for PermissionTable {
    fn has_permission(&self, principal: &Principal, permission: &str) -> bool {
        if !principal.is_restricted() {
            return true;
        }
        let Ok(grants) = self.grants.read() else {
            return false;
        };
        let Some(held) = grants.get(&principal.name().to_lowercase()) else {
            return false;
        };

        let permission = permission.to_lowercase();
        if held.contains("*") || held.contains(&permission) {
            return true;
        }
        // walk up the dotted path looking for a wildcard grant
        let mut rest = permission.as_str();
        while let Some((parent, _)) = rest.rsplit_once('.') {
            if held.contains(&format!("{}.*", parent)) {
                return true;
            }
            rest = parent;
        }
        false
    }
}

/// One message handed to a principal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub recipient: String,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Records every delivery and optionally echoes it to stdout
#[derive(Default)]
pub struct ConsoleMessenger {
    echo: bool,
    deliveries: Mutex<Vec<Delivery>>,
}

impl ConsoleMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Drain everything delivered so far
    pub fn take(&self) -> Vec<Delivery> {
        self.deliveries
            .lock()
            .map(|mut d| std::mem::take(&mut *d))
            .unwrap_or_default()
    }

    pub fn received_by(&self, name: &str) -> Vec<String> {
        self.deliveries
            .lock()
            .map(|d| {
                d.iter()
                    .filter(|m| m.recipient.eq_ignore_ascii_case(name))
                    .map(|m| m.text.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn last_for(&self, name: &str) -> Option<String> {
        self.received_by(name).pop()
    }
}

impl Messenger for ConsoleMessenger {
    fn send(&self, principal: &Principal, text: &str) {
        if self.echo {
            println!("[{}] {}", principal.name(), strip_colours(text));
        }
        if let Ok(mut deliveries) = self.deliveries.lock() {
            deliveries.push(Delivery {
                recipient: principal.name().to_string(),
                text: text.to_string(),
                at: Utc::now(),
            });
        }
    }
}

/// The console host: routes typed lines through its command map
pub struct ConsoleServer {
    name: String,
    host: Arc<CommandMap>,
    permissions: Arc<PermissionTable>,
    messenger: Arc<ConsoleMessenger>,
    world: Arc<InMemoryWorld>,
    parser: CommandParser,
    unknown_command: String,
}

impl ConsoleServer {
    pub fn new(messenger: ConsoleMessenger) -> Self {
        let messenger = Arc::new(messenger);
        let host = Arc::new(CommandMap::new());
        let version = StaticReply::new(
            format!("This server is running commandeer {}", env!("CARGO_PKG_VERSION")),
            messenger.clone(),
        );
        if let Err(e) = host.register("version", Arc::new(version)) {
            debug!("could not register built-in version command: {}", e);
        }

        Self {
            name: "commandeer".to_string(),
            host,
            permissions: Arc::new(PermissionTable::new()),
            messenger,
            world: Arc::new(InMemoryWorld::new()),
            parser: CommandParser::default(),
            unknown_command: UNKNOWN_COMMAND.to_string(),
        }
    }

    /// Build a host with the configured players online and their grants applied
    pub fn from_config(config: &Config) -> Self {
        let server = Self::new(ConsoleMessenger::new().with_echo(config.console.echo))
            .with_name(config.server.name.clone())
            .with_prefix(config.server.prefix.clone());
        for player in &config.console.players {
            server.world.join(player.name.clone());
            for permission in &player.permissions {
                server.permissions.grant(&player.name, permission.clone());
            }
        }
        server
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.parser = CommandParser::new(prefix);
        self
    }

    /// Text sent when a label has nothing registered under it
    pub fn with_unknown_command(mut self, text: impl Into<String>) -> Self {
        self.unknown_command = text.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host(&self) -> Arc<CommandMap> {
        self.host.clone()
    }

    pub fn permissions(&self) -> Arc<PermissionTable> {
        self.permissions.clone()
    }

    pub fn messenger(&self) -> Arc<ConsoleMessenger> {
        self.messenger.clone()
    }

    pub fn world(&self) -> Arc<InMemoryWorld> {
        self.world.clone()
    }

    /// Run typed text as `principal`; returns what the executor reported
    pub fn execute(&self, principal: &Principal, text: &str) -> bool {
        let Some(line) = self.parser.parse(text) else {
            return false;
        };

        match self.host.lookup(&line.label) {
            Some(executor) => executor.execute(principal, &line.label, &line.args),
            None => {
                debug!("no executor registered for /{}", line.label);
                self.messenger.send(principal, &self.unknown_command);
                false
            }
        }
    }

    /// Split REPL input into who is speaking and what they typed
    ///
    /// `@alice /slap bob` runs as player alice; anything else runs as the console.
    pub fn parse_input(input: &str) -> (Principal, &str) {
        let input = input.trim();
        if let Some(rest) = input.strip_prefix('@') {
            let (name, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if !name.is_empty() {
                return (Principal::player(name), text.trim_start());
            }
        }
        (Principal::console(), input)
    }
}

impl Default for ConsoleServer {
    fn default() -> Self {
        Self::new(ConsoleMessenger::new())
    }
}
