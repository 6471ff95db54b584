use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Dataset error: {0}")]
    DatasetError(String),

    #[error("Invalid Riot ID format. Use format: Name#TAG")]
    InvalidRiotId,

    #[error("Resource not found")]
    NotFound,

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("No masteries stored for {0}")]
    MasteriesNotFound(String),

    #[error("Rate limit exceeded, please try again later")]
    RateLimited,
}
