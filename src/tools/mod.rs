// src/tools/mod.rs

//! Python tool installations: the registry abstraction and name resolution.

pub mod installation;
pub mod resolver;

pub use installation::{ConfiguredRegistry, Installation, InstallationRegistry};
pub use resolver::resolve;
