use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use std::path::Path;

use ragchat_chat::{AuthForm, AuthMode, ChatStore, Dashboard, SendOutcome, UploadForm};
use ragchat_types::{Identity, SessionId};

use crate::app::prompt;
use crate::app::repl::run_repl_mode;
use crate::app::setup::Workspace;
use crate::cli::Commands;
use crate::render;

/// Execute one subcommand against the workspace
pub async fn run_command(ws: &mut Workspace, command: &Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            sign_in(ws, AuthMode::Login, email, password.clone()).await
        }
        Commands::Register { email, password } => {
            sign_in(ws, AuthMode::Register, email, password.clone()).await
        }
        Commands::Logout => {
            ws.auth.logout();
            println!("{}", "Signed out.".bright_black());
            Ok(())
        }
        Commands::Whoami => {
            let identity = signed_in(ws).await?;
            println!("{} (id {})", identity.email.bold(), identity.id);
            println!("{}", ws.config.api_url.bright_black());
            Ok(())
        }
        Commands::History { session } => history(ws, *session).await,
        Commands::Ask { message, session } => ask(ws, message, *session).await,
        Commands::Upload { path } => upload(ws, path).await,
        Commands::Documents => documents(ws).await,
        Commands::Dashboard => dashboard(ws).await,
        Commands::Chat => run_repl_mode(ws).await,
        // Generated in main before any workspace is opened
        Commands::Completions { .. } => Ok(()),
    }
}

/// Restore the persisted session and require an identity
pub(crate) async fn signed_in(ws: &mut Workspace) -> Result<Identity> {
    ws.auth.restore().await;
    Ok(ws.auth.require_identity()?.clone())
}

async fn sign_in(ws: &mut Workspace, mode: AuthMode, email: &str, password: Option<String>) -> Result<()> {
    let mut form = AuthForm::new(mode);
    form.email = email.to_string();
    form.password = match password {
        Some(password) => password,
        None => prompt::read_password()?,
    };

    if !form.submit(&mut ws.auth).await {
        bail!(form.error().unwrap_or("Unable to authenticate.").to_string());
    }

    if let Some(identity) = ws.auth.identity() {
        println!("{} {}", "Signed in as".green(), identity.email.bold());
    }
    Ok(())
}

async fn history(ws: &mut Workspace, session: Option<SessionId>) -> Result<()> {
    signed_in(ws).await?;
    let store = ChatStore::mount(ws.client.clone()).await;
    if let Some(error) = store.error() {
        bail!(error.to_string());
    }

    match session {
        Some(id) => {
            let found = store
                .sessions()
                .iter()
                .find(|s| s.session_id == id)
                .ok_or_else(|| anyhow!("No session #{}", id))?;
            println!("{}\n", found.title.bold());
            print!("{}", render::transcript(Some(found)));
        }
        None => print!("{}", render::session_list(store.sessions(), None)),
    }
    Ok(())
}

async fn ask(ws: &mut Workspace, message: &str, session: Option<SessionId>) -> Result<()> {
    signed_in(ws).await?;

    let mut store = match session {
        Some(id) => {
            let mut store = ChatStore::mount(ws.client.clone()).await;
            if let Some(error) = store.error() {
                bail!(error.to_string());
            }
            store.set_active_session_id(id);
            store
        }
        None => ChatStore::new(ws.client.clone()),
    };

    let outcome = store.send_message(message).await;
    store.close();

    match outcome {
        SendOutcome::Sent(id) => {
            if let Some(answer) = store.session(id).and_then(|s| s.messages.last()) {
                print!("{}", render::message(answer));
            }
            match session {
                Some(requested) if requested != id => println!(
                    "{}",
                    format!("session #{} was not found; the server answered in new session #{}", requested, id)
                        .yellow()
                ),
                _ => println!("{}", format!("session #{}", id).bright_black()),
            }
            Ok(())
        }
        SendOutcome::Skipped => bail!("Nothing to send: the message is empty."),
        SendOutcome::Failed | SendOutcome::Discarded => {
            bail!(store.error().unwrap_or("Failed to send message.").to_string())
        }
    }
}

async fn upload(ws: &mut Workspace, path: &Path) -> Result<()> {
    signed_in(ws).await?;
    upload_file(ws, path).await
}

/// Shared by the `upload` subcommand and the REPL's `/upload`
pub(crate) async fn upload_file(ws: &Workspace, path: &Path) -> Result<()> {
    let mut form = UploadForm::new();
    form.select_file(path);
    println!("{}", format!("Uploading {}...", path.display()).bright_black());

    if form.submit(&ws.client).await {
        println!("{}", form.status().unwrap_or_default().green());
        Ok(())
    } else {
        bail!(form.error().unwrap_or("Upload failed.").to_string())
    }
}

async fn documents(ws: &mut Workspace) -> Result<()> {
    signed_in(ws).await?;
    let docs = ws
        .client
        .list_documents()
        .await
        .map_err(|e| anyhow!(e.user_message("Unable to load documents.")))?;
    print!("{}", render::documents(&docs));
    Ok(())
}

async fn dashboard(ws: &mut Workspace) -> Result<()> {
    signed_in(ws).await?;
    show_dashboard(ws).await
}

/// Shared by the `dashboard` subcommand and the REPL's `/dashboard`
pub(crate) async fn show_dashboard(ws: &Workspace) -> Result<()> {
    let mut dashboard = Dashboard::new();
    dashboard.load(&ws.client).await;
    if let Some(error) = dashboard.error() {
        bail!(error.to_string());
    }
    print!("{}", render::dashboard(&dashboard));
    Ok(())
}
