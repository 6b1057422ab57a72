use thiserror::Error;

#[derive(Debug, Error)]
pub enum MacroError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("Rate limited by upstream service")]
    RateLimited,

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("Insufficient items: {available} available, {required} required")]
    InsufficientItems { available: usize, required: usize },

    #[error("No solution found")]
    NoSolution,

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

impl From<ureq::Error> for MacroError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(429, _) => MacroError::RateLimited,
            ureq::Error::Status(code, _) => MacroError::UpstreamStatus(code),
            ureq::Error::Transport(t) => MacroError::Http(t.to_string()),
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for MacroError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        MacroError::WorkerPool(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MacroError>;
