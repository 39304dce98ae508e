use anyhow::{bail, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Read one line; `None` on Ctrl-C or Ctrl-D
pub fn read_field(editor: &mut DefaultEditor, label: &str) -> Result<Option<String>> {
    match editor.readline(label) {
        Ok(line) => Ok(Some(line.trim_end_matches(['\r', '\n']).to_string())),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Prompt for a password on the terminal.
///
/// The line is not added to history.
pub fn read_password() -> Result<String> {
    let mut editor = DefaultEditor::new()?;
    match read_field(&mut editor, "Password: ")? {
        Some(password) => Ok(password),
        None => bail!("Password entry cancelled"),
    }
}
