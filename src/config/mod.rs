//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (user config dir)
//! 3. Project config (.plancraft/config.toml)
//! 4. Environment variables (PLANCRAFT_*)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
