//! # ragchat-api
//!
//! HTTP client for the retrieval-augmented chat workspace backend.
//!
//! ## Features
//!
//! - **One client for every endpoint**: auth, chat history and queries,
//!   document upload, analytics
//! - **Persisted bearer token**: a single [`TokenStore`] slot shared by every
//!   outgoing request
//! - **Backend seams**: the state managers depend on the [`AuthBackend`],
//!   [`ChatBackend`], [`DocumentBackend`] and [`AnalyticsBackend`] traits so
//!   they can run against fakes
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ragchat_api::{ApiClient, MemoryTokenStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ragchat_api::ApiError> {
//!     let client = ApiClient::new("http://localhost:5000", Arc::new(MemoryTokenStore::new()));
//!     let auth = client.login("a@b.com", "secret1").await?;
//!     client.tokens().save(&auth.access_token)?;
//!
//!     for session in client.history().await? {
//!         println!("{} ({} messages)", session.title, session.messages.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod client;
pub mod error;
pub mod token;

pub use backend::{AnalyticsBackend, AuthBackend, ChatBackend, DocumentBackend};
pub use client::{mime_for_path, ApiClient, DEFAULT_API_URL};
pub use error::{ApiError, TokenStoreError};
pub use token::{get_ragchat_dir, FileTokenStore, MemoryTokenStore, TokenStore};
