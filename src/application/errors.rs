//! Application layer errors

use thiserror::Error;

/// Top-level engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Module error: {0}")]
    Module(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised by command handlers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandlerError {
    /// A user-facing failure; the text is relayed to the sender verbatim
    #[error("{0}")]
    Command(String),

    /// Anything else; logged in full, the sender only sees a generic message
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    pub fn command(message: impl Into<String>) -> Self {
        HandlerError::Command(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        HandlerError::Internal(message.into())
    }
}

/// Reasons a declared command is refused at load time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("invalid command name '{0}'")]
    InvalidName(String),

    #[error("invalid alias '{alias}' for command '{command}'")]
    InvalidAlias { command: String, alias: String },

    #[error("command '{0}' has no handler")]
    MissingHandler(String),

    #[error("command '{command}' has unhandle-able parameter type: {param}")]
    UnsupportedParameter { command: String, param: String },

    #[error("command '{0}' declares a string tail that is not the last parameter")]
    TailNotLast(String),

    #[error("command '{0}' can't be BOTH console-only and player-only")]
    ConflictingSenderKinds(String),
}

/// Host command-map errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Command '{0}' is not registered")]
    NotRegistered(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
