//! ragchat terminal client
//!
//! Subcommands and an interactive REPL on top of the workspace state in
//! `ragchat-chat`.

pub use ragchat_api as api;
pub use ragchat_chat as chat;
pub use ragchat_types as types;

pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod render;

pub use app::{run_command, run_repl_mode, setup_from_cli, Workspace};
pub use cli::{Cli, Commands};
pub use config::AppConfig;
