use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use ragchat_types::SessionId;

/// CLI arguments for ragchat
#[derive(Parser, Debug)]
#[command(name = "ragchat")]
#[command(about = "Terminal client for a retrieval-augmented chat workspace")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the workspace API (e.g., http://localhost:5000)
    #[arg(long, global = true, value_name = "URL", env = "RAGCHAT_API_URL")]
    pub api_url: Option<String>,

    /// File holding the persisted bearer token (default: ~/.ragchat/token)
    #[arg(long, global = true, value_name = "PATH", env = "RAGCHAT_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Path to config file (default: ~/.ragchat/config.toml)
    #[arg(long, global = true, value_name = "PATH", env = "RAGCHAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose debug output on stderr (requests, state transitions)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the access token
    Login {
        /// Account email
        email: String,
        /// Password (prompted when omitted)
        #[arg(long, env = "RAGCHAT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account and sign in
    Register {
        /// Account email
        email: String,
        /// Password, at least 6 characters (prompted when omitted)
        #[arg(long, env = "RAGCHAT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored access token
    Logout,
    /// Show the signed-in account
    Whoami,
    /// List chat sessions, or show one session's messages
    History {
        /// Session to show in full
        #[arg(short = 's', long)]
        session: Option<SessionId>,
    },
    /// Ask a single question
    Ask {
        /// Question text
        message: String,
        /// Continue this session instead of starting a new one
        #[arg(short = 's', long)]
        session: Option<SessionId>,
    },
    /// Upload a PDF, Markdown or plain-text document for ingestion
    Upload {
        /// Path to the document
        path: PathBuf,
    },
    /// List ingested documents
    Documents,
    /// Show usage analytics
    Dashboard,
    /// Interactive chat (default when no subcommand is given)
    Chat,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
