use std::sync::Arc;

use crate::application::errors::HostError;
use crate::domain::entities::Principal;

/// Something the host can hand a typed command line to
pub trait CommandExecutor: Send + Sync {
    /// Execute `label` for `sender`; returns whether the command was handled
    fn execute(&self, sender: &Principal, label: &str, args: &[String]) -> bool;
}

/// Host server command map - abstraction over the game server's registration API
pub trait CommandHost: Send + Sync {
    /// Install `executor` as the sole executor for `name`
    fn register(&self, name: &str, executor: Arc<dyn CommandExecutor>) -> Result<(), HostError>;

    /// Remove whatever is registered under `name`
    fn unregister(&self, name: &str) -> Result<(), HostError>;

    /// Look up the executor currently registered under `name`
    fn lookup(&self, name: &str) -> Option<Arc<dyn CommandExecutor>>;
}
