//! Host adapters

pub mod console;

pub use console::{CommandMap, ConsoleMessenger, ConsoleServer, Delivery, PermissionTable, StaticReply};
