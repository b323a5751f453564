use thiserror::Error;

pub type Result<T> = std::result::Result<T, HassError>;

#[derive(Error, Debug)]
pub enum HassError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),
    #[error("Home Assistant returned HTTP {code}: {message}")]
    Remote { code: u16, message: String },
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Card {0} has no content to play")]
    NothingToPlay(String),
    #[error("Invalid service name '{0}', expected 'domain/service'")]
    InvalidService(String),
}

impl HassError {
    pub fn configuration(message: impl Into<String>) -> Self {
        HassError::Configuration(message.into())
    }
}
