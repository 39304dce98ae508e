use anyhow::Result;
use std::sync::Arc;

use ragchat_api::{ApiClient, FileTokenStore, TokenStore};
use ragchat_chat::AuthSession;

use crate::cli::Cli;
use crate::config::AppConfig;

/// Everything a command needs: the HTTP client and the signed-in session.
/// The client and the session share one token slot.
pub struct Workspace {
    pub config: AppConfig,
    pub client: ApiClient,
    pub auth: AuthSession<ApiClient>,
}

impl Workspace {
    pub fn new(config: AppConfig, tokens: Arc<dyn TokenStore>) -> Self {
        let client = ApiClient::new(config.api_url.clone(), tokens.clone());
        let auth = AuthSession::new(client.clone(), tokens);
        Self { config, client, auth }
    }
}

/// Resolve configuration and open the workspace with the persisted token.
/// The session is not restored here; commands that need it call
/// [`AuthSession::restore`].
pub fn setup_from_cli(cli: &Cli) -> Result<Workspace> {
    let config = AppConfig::from_cli(cli)?;
    tracing::debug!(api_url = %config.api_url, token_file = %config.token_file.display(), "configuration resolved");

    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.token_file.clone()));
    Ok(Workspace::new(config, tokens))
}
