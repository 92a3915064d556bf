//! Harness error type

use crate::frames::ParseError;

/// Errors raised while preparing or running frames
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The frame table could not be read or understood. Fatal for the run.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A frame or configuration value the harness does not recognise.
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    pub fn config(message: impl Into<String>) -> Self {
        HarnessError::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
