//! Domain layer - Core command-routing types
//!
//! This layer contains:
//! - Entities: Principals, command specs and descriptors, signature keys, typed arguments
//! - Traits: Abstractions for the host server (command map, permissions, messaging, world)

pub mod entities;
pub mod traits;
