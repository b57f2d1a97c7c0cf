//! Error types and result aliases for the agrocam crate.
//!
//! Every fallible public API returns [`Result<T>`]. Calculators only fail on
//! malformed numeric input ([`AgroError::Validation`]); unknown crop or region
//! names are resolved to documented defaults and never surface as errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgroError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("LLM gateway error: {0}")]
    Gateway(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Timeout error: {0}")]
    Timeout(String),
}

impl AgroError {
    /// Shorthand used by the calculators when rejecting a numeric input.
    pub fn invalid(field: &str, reason: impl std::fmt::Display) -> Self {
        AgroError::Validation(format!("{field}: {reason}"))
    }
}

impl From<reqwest::Error> for AgroError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AgroError::Timeout(err.to_string())
        } else {
            AgroError::Http(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, AgroError>;
