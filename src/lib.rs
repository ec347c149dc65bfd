//! Embedded lua scripting prelude.
//!
//! This crate wires a host-supplied table of lua sources into an embedded
//! interpreter: scripts `require` each other through a virtual module
//! resolver, talk to each other through an ordered event bus, and the host
//! calls back into script functions by name.

pub mod config;
pub mod engine;
pub mod events;
pub mod loader;
pub mod logging;
pub mod modules;

mod bridge;

// Re-export commonly used types for embedding hosts
pub use config::{ConfigError, ScriptingConfig};
pub use engine::{ScriptEngine, ScriptError, ENTRY_MODULE, STDLIB_MODULE};
pub use events::EventBus;
pub use modules::ModuleRegistry;

/// Crate version, as published.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
