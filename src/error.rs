use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Profile store error: {0}")]
    StoreError(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid date '{0}': expected ISO-8601 timestamp or YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PortalError>;
