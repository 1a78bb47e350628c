//! Domain traits - Abstractions for host server collaborators

pub mod host;
pub mod messenger;
pub mod permissions;
pub mod world;

pub use host::{CommandExecutor, CommandHost};
pub use messenger::Messenger;
pub use permissions::PermissionProvider;
pub use world::{GameWorld, Vector3};
