use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use ragchat_api::{get_ragchat_dir, TokenStoreError, DEFAULT_API_URL};

use crate::cli::Cli;

mod helpers;
pub use helpers::{expand_tilde, normalize_api_url};

/// Optional settings read from `~/.ragchat/config.toml`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub token_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Fully resolved runtime settings
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    pub token_file: PathBuf,
    pub verbose: bool,
}

impl AppConfig {
    /// Resolve settings with precedence: CLI flag / environment > config file > defaults.
    ///
    /// An explicit `--config` path must exist; the default location is optional.
    /// The home directory is only consulted for paths the user did not give.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Self::load(cli, get_ragchat_dir().ok())
    }

    pub(crate) fn load(cli: &Cli, ragchat_dir: Option<PathBuf>) -> Result<Self> {
        let file = match (&cli.config, &ragchat_dir) {
            (Some(path), _) => FileConfig::load_from_file(expand_tilde(path))?,
            (None, Some(dir)) if dir.join("config.toml").exists() => {
                FileConfig::load_from_file(dir.join("config.toml"))?
            }
            (None, _) => FileConfig::default(),
        };

        Self::resolve(cli, file, || {
            ragchat_dir
                .map(|dir| dir.join("token"))
                .ok_or(TokenStoreError::NoHomeDir)
        })
    }

    pub(crate) fn resolve<F>(cli: &Cli, file: FileConfig, default_token: F) -> Result<Self>
    where
        F: FnOnce() -> Result<PathBuf, TokenStoreError>,
    {
        let api_url = cli
            .api_url
            .clone()
            .or(file.api_url)
            .map(|url| normalize_api_url(&url))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let token_file = match cli.token_file.clone().or(file.token_file) {
            Some(path) => expand_tilde(&path),
            None => default_token()?,
        };

        Ok(Self {
            api_url,
            token_file,
            verbose: cli.verbose,
        })
    }
}
