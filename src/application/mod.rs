//! Application layer - Command registration and dispatch
//!
//! This layer contains:
//! - Services: Discovery, the command table and the command service
//! - Messaging: Parsing, coercion, permission checks, dispatch
//! - Errors: Engine, handler, discovery, host and config errors

pub mod errors;
pub mod messaging;
pub mod services;
