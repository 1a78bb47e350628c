//! Command handling - parsing, coercion, permission checks and dispatch

pub mod coercer;
pub mod dispatcher;
pub mod invoker;
pub mod messages;
pub mod parser;
pub mod permission;

pub use coercer::{coerce, CoercionError};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use invoker::Invocation;
pub use messages::Messages;
pub use parser::CommandParser;
pub use permission::PermissionGate;
