use thiserror::Error;

#[derive(Error, Debug)]
pub enum PocketError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to call the Pocket API ({step}): {source}")]
    Network {
        step: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to call the Pocket API ({step}): {reason}")]
    Transport { step: &'static str, reason: String },

    #[error("Failed to get {step}: HTTP {status}: {message} [{code}]")]
    Api {
        step: &'static str,
        status: u16,
        message: String,
        code: String,
    },

    #[error("Failed to parse {step}: {reason}")]
    Decode { step: &'static str, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Authorization error: {0}")]
    Auth(String),
}

impl PocketError {
    pub fn decode(step: &'static str, reason: impl std::fmt::Display) -> Self {
        PocketError::Decode {
            step,
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PocketError>;
