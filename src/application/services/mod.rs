//! Application services - load-time registration and command routing

pub mod command_service;
pub mod command_table;
pub mod discovery;

pub use command_service::{CommandService, LoadReport};
pub use command_table::CommandTable;
pub use discovery::{discover, Discovered};
