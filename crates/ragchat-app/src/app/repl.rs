use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

use ragchat_api::ApiClient;
use ragchat_chat::{AuthForm, AuthMode, ChatStore, Completion, SendOutcome};
use ragchat_types::SessionId;

use crate::app::commands::{show_dashboard, upload_file};
use crate::app::prompt::read_field;
use crate::app::setup::Workspace;
use crate::render;

const HELP: &str = "\
Commands:
  /new              start a new session (your next question opens it)
  /sessions         list sessions
  /switch <id>      make a session active and show it
  /reload           reload history from the server
  /upload <path>    ingest a PDF, Markdown or text document
  /dashboard        show usage analytics
  /logout           sign out and leave
  /help             show this help
  /exit             leave (also: exit, quit, Ctrl-D)
Anything else is sent as a question to the active session.";

/// One parsed line of REPL input
#[derive(Debug, Clone, PartialEq)]
enum ReplCommand {
    Ask(String),
    New,
    Sessions,
    Switch(SessionId),
    Reload,
    Upload(PathBuf),
    Dashboard,
    Logout,
    Help,
    Exit,
    /// Recognized command with bad arguments; holds the usage hint
    Usage(&'static str),
    Unknown(String),
    Empty,
}

fn parse_line(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::Empty;
    }
    if matches!(trimmed, "exit" | "quit") {
        return ReplCommand::Exit;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return ReplCommand::Ask(trimmed.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "new" => ReplCommand::New,
        "sessions" => ReplCommand::Sessions,
        "switch" => match arg.parse::<SessionId>() {
            Ok(id) => ReplCommand::Switch(id),
            Err(_) => ReplCommand::Usage("Usage: /switch <session id>"),
        },
        "reload" => ReplCommand::Reload,
        "upload" if arg.is_empty() => ReplCommand::Usage("Usage: /upload <path>"),
        "upload" => ReplCommand::Upload(PathBuf::from(arg)),
        "dashboard" => ReplCommand::Dashboard,
        "logout" => ReplCommand::Logout,
        "help" | "?" => ReplCommand::Help,
        "exit" | "quit" => ReplCommand::Exit,
        other => ReplCommand::Unknown(other.to_string()),
    }
}

fn prompt_label(store: &ChatStore<ApiClient>) -> String {
    match store.active_session() {
        Some(session) => format!("[#{} {}] › ", session.session_id, session.title),
        None => match store.active_session_id() {
            Some(id) => format!("[#{}] › ", id),
            None => "[new session] › ".to_string(),
        },
    }
}

/// Note shown when the answer landed outside the active session
fn redirect_note(active: Option<SessionId>, answered: SessionId) -> Option<String> {
    match active {
        Some(active) if active != answered => Some(format!(
            "Session #{} was not found; the answer went to session #{} (/switch {} to continue there).",
            active, answered, answered
        )),
        _ => None,
    }
}

/// Interactive sign-in. Returns `false` when the user gives up.
async fn sign_in(ws: &mut Workspace, editor: &mut DefaultEditor) -> Result<bool> {
    let mut form = AuthForm::new(AuthMode::Login);
    println!("{}", "Type /register or /login at the email prompt to switch modes.".bright_black());

    loop {
        println!("{}", form.mode.title().bold());
        let Some(email) = read_field(editor, "Email: ")? else {
            return Ok(false);
        };
        match email.trim() {
            "/register" if form.mode == AuthMode::Login => {
                form.toggle_mode();
                continue;
            }
            "/login" if form.mode == AuthMode::Register => {
                form.toggle_mode();
                continue;
            }
            _ => {}
        }
        let Some(password) = read_field(editor, "Password: ")? else {
            return Ok(false);
        };

        form.email = email.trim().to_string();
        form.password = password;
        println!("{}", format!("{}...", form.mode.action()).bright_black());
        if form.submit(&mut ws.auth).await {
            return Ok(true);
        }
        if let Some(error) = form.error() {
            println!("{}", error.red());
        }
    }
}

/// Run the interactive chat loop
pub async fn run_repl_mode(ws: &mut Workspace) -> Result<()> {
    println!("{}", "ragchat · retrieval augmented chat".bright_cyan().bold());
    println!("{}", format!("API: {}", ws.config.api_url).bright_black());
    println!("{}", "Type /help for commands, /exit to leave\n".bright_black());

    let mut editor = DefaultEditor::new()?;

    ws.auth.restore().await;
    if ws.auth.must_authenticate() && !sign_in(ws, &mut editor).await? {
        return Ok(());
    }
    let identity = ws.auth.require_identity()?.clone();
    println!("{} {}\n", "Signed in as".green(), identity.email.bold());

    let mut store = ChatStore::mount(ws.client.clone()).await;
    if let Some(error) = store.error() {
        println!("{}", error.red());
    }
    print!("{}", render::session_list(store.sessions(), store.active_session_id()));
    println!();
    print!("{}", render::transcript(store.active_session()));

    loop {
        let line = match editor.readline(&prompt_label(&store)) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C (use /exit to leave)".bright_black());
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                store.close();
                return Err(err.into());
            }
        };
        if !line.trim().is_empty() {
            let _ = editor.add_history_entry(line.as_str());
        }

        match parse_line(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Ask(text) => {
                println!("{}", "Thinking...".bright_black());
                match store.send_message(&text).await {
                    SendOutcome::Sent(id) => {
                        if let Some(answer) = store.session(id).and_then(|s| s.messages.last()) {
                            print!("{}", render::message(answer));
                        }
                        if let Some(note) = redirect_note(store.active_session_id(), id) {
                            println!("{}", note.yellow());
                        }
                    }
                    SendOutcome::Failed => {
                        println!("{}", store.error().unwrap_or("Failed to send message.").red());
                    }
                    SendOutcome::Skipped | SendOutcome::Discarded => {}
                }
            }
            ReplCommand::New => {
                store.create_session();
                println!("{}", "New session. Your next question opens it.".bright_black());
            }
            ReplCommand::Sessions => {
                print!("{}", render::session_list(store.sessions(), store.active_session_id()));
            }
            ReplCommand::Switch(id) => {
                store.set_active_session_id(id);
                print!("{}", render::transcript(store.active_session()));
            }
            ReplCommand::Reload => match store.reload_history().await {
                Completion::Applied => {
                    print!("{}", render::session_list(store.sessions(), store.active_session_id()));
                }
                Completion::Failed => {
                    println!("{}", store.error().unwrap_or("Failed to load history.").red());
                }
                Completion::Discarded => {}
            },
            ReplCommand::Upload(path) => {
                if let Err(e) = upload_file(ws, &path).await {
                    println!("{}", e.to_string().red());
                }
            }
            ReplCommand::Dashboard => {
                if let Err(e) = show_dashboard(ws).await {
                    println!("{}", e.to_string().red());
                }
            }
            ReplCommand::Logout => {
                ws.auth.logout();
                println!("{}", "Signed out.".bright_black());
                break;
            }
            ReplCommand::Help => println!("{}", HELP),
            ReplCommand::Exit => break,
            ReplCommand::Usage(hint) => println!("{}", hint.yellow()),
            ReplCommand::Unknown(name) => {
                println!("{}", format!("Unknown command /{} (try /help)", name).yellow());
            }
        }
    }

    store.close();
    println!("{}", "Goodbye.".bright_black());
    Ok(())
}
