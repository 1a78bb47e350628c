//! Domain entities - Core command-routing objects

pub mod args;
pub mod command;
pub mod command_line;
pub mod principal;
pub mod signature;

pub use args::{ArgValue, Args};
pub use command::{CommandHandler, CommandInfo, CommandSpec, Descriptor, ParamKind, SenderKind};
pub use command_line::CommandLine;
pub use principal::{Player, Principal, PrincipalKind};
pub use signature::SignatureKey;
