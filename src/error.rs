//! Error types for onebox-client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{operation} failed with status {status}")]
    Status {
        operation: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Thread {0} not found")]
    ThreadNotFound(String),

    #[error("Template {0} not found")]
    TemplateNotFound(String),

    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
