//! Infrastructure layer - External concerns
//!
//! Configuration, the console host and the in-memory world it drives.

pub mod adapters;
pub mod config;
pub mod world;
