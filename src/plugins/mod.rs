//! Feature modules and the manager that tracks them

pub mod fun;
pub mod manager;
pub mod trait_def;
pub mod utility;

pub use fun::FunModule;
pub use manager::{ModuleEntry, ModuleInfo, ModuleManager};
pub use trait_def::{Module, ModuleConfig};
pub use utility::UtilityModule;
