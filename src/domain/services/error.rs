use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Whether the error was caused by the caller rather than by the service
    /// or one of its upstreams.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// The message shown to API clients. Transport and decoding details stay
    /// in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidInput(msg)
            | Self::Configuration(msg)
            | Self::Upstream(msg) => msg.clone(),
            Self::ParseError(_) | Self::Json(_) => "Malformed upstream response".to_string(),
            Self::Http(_) => "Upstream request failed".to_string(),
        }
    }
}
