// src/error.rs
use thiserror::Error;

/// Search request failed; the cycle is skipped and state is left untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("error fetching appointments: {0}")]
    Transport(String),

    #[error("search returned unexpected status {0}")]
    Status(u16),

    #[error("could not decode search response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Notification request failed. Logged, never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("error notifying: {0}")]
    Transport(String),

    #[error("unexpected status returned: {0}")]
    Status(u16),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Transport(err.to_string())
    }
}

/// Every parameter problem found at startup, reported together.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid params: {}", .violations.join("; "))]
pub struct ConfigError {
    pub violations: Vec<String>,
}
