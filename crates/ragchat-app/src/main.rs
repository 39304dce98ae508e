use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;

use ragchat::logging::init_tracing;
use ragchat::{run_command, setup_from_cli, Cli, Commands};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(Commands::Completions { shell }) = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "ragchat", &mut std::io::stdout());
        return Ok(());
    }

    let mut workspace = setup_from_cli(&cli)?;
    let command = cli.command.unwrap_or(Commands::Chat);
    run_command(&mut workspace, &command).await
}
