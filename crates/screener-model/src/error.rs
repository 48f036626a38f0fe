use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScreenerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed request: {0}")]
    Json(#[from] serde_json::Error),
    #[error("filter worker has stopped")]
    WorkerStopped,
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ScreenerError>;
