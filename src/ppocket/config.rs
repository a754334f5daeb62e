use crate::error::{PocketError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_BASE_URL: &str = "https://getpocket.com";
const DEFAULT_AUTHORIZE_URL: &str = "https://getpocket.com/auth/authorize";
const DEFAULT_REDIRECT_URI: &str = "https://ppocket.herokuapp.com/";
const DEFAULT_WORDS_PER_MINUTE: u32 = 140;

const REQUEST_TOKEN_PATH: &str = "/v3/oauth/request";
const ACCESS_TOKEN_PATH: &str = "/v3/oauth/authorize";
const RETRIEVE_PATH: &str = "/v3/get";

/// Configuration for ppocket, stored in `config.json` under the config dir.
///
/// Loaded once at start; nothing mutates it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PocketConfig {
    /// Root of the Pocket API (endpoints are resolved against it)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Page the user visits to grant access to the application
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,

    /// Where Pocket sends the browser once access is granted
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    /// Reading speed used to turn word counts into minutes
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_authorize_url() -> String {
    DEFAULT_AUTHORIZE_URL.to_string()
}

fn default_redirect_uri() -> String {
    DEFAULT_REDIRECT_URI.to_string()
}

fn default_words_per_minute() -> u32 {
    DEFAULT_WORDS_PER_MINUTE
}

impl Default for PocketConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            authorize_url: default_authorize_url(),
            redirect_uri: default_redirect_uri(),
            words_per_minute: default_words_per_minute(),
        }
    }
}

impl PocketConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: PocketConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(PocketError::Config("base_url cannot be empty".into()));
        }
        if self.words_per_minute == 0 {
            return Err(PocketError::Config(
                "words_per_minute must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn request_token_url(&self) -> String {
        self.endpoint(REQUEST_TOKEN_PATH)
    }

    pub fn access_token_url(&self) -> String {
        self.endpoint(ACCESS_TOKEN_PATH)
    }

    pub fn retrieve_url(&self) -> String {
        self.endpoint(RETRIEVE_PATH)
    }

    /// URL the user must open to approve the request code
    pub fn user_grant_url(&self, request_code: &str) -> Result<String> {
        let query = serde_urlencoded::to_string(&[
            ("request_token", request_code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .map_err(|e| PocketError::Config(format!("cannot build authorization URL: {e}")))?;
        Ok(format!("{}?{}", self.authorize_url, query))
    }
}
