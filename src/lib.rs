//! commandeer - command registration and dispatch for game-server modules
//!
//! Modules declare command shapes, the engine validates them into a command
//! table, installs every active name with the host and routes each typed
//! command line to the first overload that fits the sender, the arguments
//! and the sender's permissions.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod plugins;

pub use application::errors::{EngineError, HandlerError};
pub use application::messaging::{DispatchOutcome, Dispatcher, Messages};
pub use application::services::{CommandService, CommandTable, LoadReport};
pub use domain::entities::{Args, CommandSpec, ParamKind, Principal};
pub use infrastructure::config::Config;
pub use plugins::{Module, ModuleConfig, ModuleManager};
