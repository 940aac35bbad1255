use thiserror::Error;

#[derive(Error, Debug)]
pub enum TributaryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Object storage error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Invalid source {id}: {reason}")]
    InvalidSource { id: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TributaryError>;
