pub mod commands;
pub mod ui;
pub mod util;

pub use util::{CommandContext, build_provider, open_database, require_initialized};
