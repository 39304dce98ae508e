use std::path::PathBuf;
use thiserror::Error;

/// Failure reading or writing the persisted bearer token
#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("home directory not found; set HOME or pass --token-file")]
    NoHomeDir,

    #[error("token file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a backend call
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {}", message.as_deref().unwrap_or("no error message"))]
    Status { status: u16, message: Option<String> },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Token(#[from] TokenStoreError),

    #[error("cannot read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// The server-supplied `error` field, if the backend sent one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// Message to show the user: the server's own text, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    /// HTTP status code for status errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected the bearer token (missing, expired or malformed)
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(422))
    }
}
