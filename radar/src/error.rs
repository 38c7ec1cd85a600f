use thiserror::Error;

#[derive(Error, Debug)]
pub enum RadarError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{what} exceeds limit: {actual} > {limit}")]
    CapacityExceeded {
        what: &'static str,
        limit: usize,
        actual: usize,
    },

    #[error("Signal adapter error: {0}")]
    SignalAdapter(String),

    #[error("Timed out after {0}ms")]
    Timeout(u64),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, RadarError>;
