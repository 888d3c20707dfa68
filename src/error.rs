use thiserror::Error;

pub type Result<T> = std::result::Result<T, FinderError>;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(std::io::Error),

    #[error("Invalid file ID: {0}")]
    InvalidFileId(String),

    #[error("Could not reveal file: {0}")]
    Reveal(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<std::io::Error> for FinderError {
    fn from(err: std::io::Error) -> Self {
        FinderError::Io(err)
    }
}

impl From<serde_json::Error> for FinderError {
    fn from(err: serde_json::Error) -> Self {
        FinderError::Json(err.to_string())
    }
}
