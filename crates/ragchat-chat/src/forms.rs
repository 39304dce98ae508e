//! State behind the sign-in and document upload screens

use std::path::{Path, PathBuf};

use ragchat_api::{mime_for_path, AuthBackend, DocumentBackend};
use ragchat_types::{UploadResponse, MAX_UPLOAD_BYTES, MIN_PASSWORD_CHARS};

use crate::auth::AuthSession;

const AUTH_ERROR: &str = "Unable to authenticate.";
const UPLOAD_ERROR: &str = "Upload failed.";
const NO_FILE_ERROR: &str = "Select a PDF or markdown file first.";

// ============================================================================
// Sign-in
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn title(&self) -> &'static str {
        match self {
            AuthMode::Login => "Sign in to resume your research.",
            AuthMode::Register => "Create an account to start exploring.",
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            AuthMode::Login => "Sign In",
            AuthMode::Register => "Create Account",
        }
    }
}

/// Email/password form that drives an [`AuthSession`]
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    error: Option<String>,
    loading: bool,
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
    }

    /// Field checks done before anything is sent
    pub fn validate(&self) -> Result<(), String> {
        if self.email.trim().is_empty() {
            return Err("Email is required.".to_string());
        }
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(format!("Password must be at least {} characters.", MIN_PASSWORD_CHARS));
        }
        Ok(())
    }

    /// Validate, then sign in or register depending on the mode. Returns
    /// whether the session is now signed in; on failure the message is in
    /// [`error`](Self::error).
    pub async fn submit<B: AuthBackend>(&mut self, auth: &mut AuthSession<B>) -> bool {
        self.error = None;
        if let Err(msg) = self.validate() {
            self.error = Some(msg);
            return false;
        }

        self.loading = true;
        let result = match self.mode {
            AuthMode::Login => auth.login(&self.email, &self.password).await,
            AuthMode::Register => auth.register(&self.email, &self.password).await,
        };
        self.loading = false;

        match result {
            Ok(_) => true,
            Err(e) => {
                self.error = Some(e.user_message(AUTH_ERROR));
                false
            }
        }
    }
}

// ============================================================================
// Upload
// ============================================================================

/// Document picker and ingestion status
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    file: Option<PathBuf>,
    status: Option<String>,
    error: Option<String>,
    loading: bool,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        self.file = Some(path.into());
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Upload the selected file. Returns whether ingestion succeeded.
    pub async fn submit<B: DocumentBackend>(&mut self, backend: &B) -> bool {
        let Some(path) = self.file.clone() else {
            self.error = Some(NO_FILE_ERROR.to_string());
            return false;
        };
        self.error = None;
        self.status = None;

        if let Err(msg) = check_file(&path).await {
            self.error = Some(msg);
            return false;
        }

        self.loading = true;
        let result = backend.upload_document(&path).await;
        self.loading = false;

        match result {
            Ok(resp) => {
                self.status = Some(upload_status(&resp));
                true
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "upload failed");
                self.error = Some(e.user_message(UPLOAD_ERROR));
                false
            }
        }
    }
}

/// Local checks mirroring what the ingestion endpoint will accept. A file
/// whose metadata can't be read is left for the upload to report.
async fn check_file(path: &Path) -> Result<(), String> {
    if mime_for_path(path).is_none() {
        return Err("Unsupported file type. Supported: PDF, Markdown (.md), Plain text.".to_string());
    }
    if let Ok(meta) = tokio::fs::metadata(path).await {
        if meta.len() > MAX_UPLOAD_BYTES {
            return Err(format!(
                "File is larger than the {} MB upload limit.",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            ));
        }
    }
    Ok(())
}

fn upload_status(resp: &UploadResponse) -> String {
    match (resp.chunks_ingested, resp.latency_ms) {
        (Some(chunks), Some(latency)) => {
            format!("Ingested {} chunks in {:.0} ms.", chunks, latency)
        }
        (Some(chunks), None) => format!("Ingested {} chunks.", chunks),
        _ => resp
            .message
            .clone()
            .unwrap_or_else(|| "Document already ingested".to_string()),
    }
}
