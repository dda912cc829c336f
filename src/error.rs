use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Network, TLS, or body decoding failure reported by the HTTP client.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response from the backend.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("request contains no messages")]
    EmptyRequest,

    #[error("backend returned no choices")]
    EmptyResponse,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("config error: {0}")]
    Config(String),
}

impl EngineError {
    /// HTTP status of the failed exchange, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            EngineError::Http { status, .. } => Some(*status),
            EngineError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }
}
