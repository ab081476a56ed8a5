mod commands;
pub mod handlers;

pub use commands::{Cli, Mode, parse_positionals, version_string};
