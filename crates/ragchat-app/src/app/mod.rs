pub mod commands;
pub mod prompt;
pub mod repl;
pub mod setup;

pub use commands::run_command;
pub use repl::run_repl_mode;
pub use setup::{setup_from_cli, Workspace};
