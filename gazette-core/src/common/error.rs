use thiserror::Error;

#[derive(Error, Debug)]
pub enum GazetteError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid fixture: {message}")]
    Fixture { message: String },
}

pub type Result<T> = std::result::Result<T, GazetteError>;
