use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Timed out after {after:?} waiting for {what}")]
    Timeout { what: String, after: Duration },

    #[error("Assertion failed: {0}")]
    Assertion(String),

    #[error("{0}")]
    Usage(String),

    #[error("Invalid lifecycle transition: {0}")]
    Lifecycle(String),

    #[error("{0}")]
    Login(String),

    #[error("WebDriver command failed: {0}")]
    WebDriver(String),

    #[error("Run interrupted before the suite started")]
    Interrupted,

    #[error("Browser session failed: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] liquid::Error),
}

impl Error {
    /// Session level failures abort the whole run instead of failing one scenario.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Session(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
