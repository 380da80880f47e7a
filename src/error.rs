use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlbumError {
    #[error("invalid Google Photos share URL: {0}")]
    InvalidUrl(String),

    #[error("failed to fetch album: {0}")]
    Fetch(String),

    #[error("empty response from Google Photos")]
    EmptyResponse,

    #[error("no photos found in album")]
    NoPhotosFound,

    #[error("settings error: {0}")]
    Settings(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AlbumError>;
