use crate::generation::GenerationPurpose;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("External API error: {0}")]
    External(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A generation step failed. The message is fixed per purpose; the
    /// underlying cause is logged where the failure is wrapped.
    #[error("{message}")]
    Generation {
        purpose: GenerationPurpose,
        message: String,
    },

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Wrap a generation failure into the generic error for `purpose`.
    pub fn generation(purpose: GenerationPurpose) -> Self {
        Error::Generation {
            purpose,
            message: purpose.failure_message().to_string(),
        }
    }

    /// Whether the error was caused by bad user input or configuration
    /// rather than a runtime failure.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::Toml(_) | Error::Validation(_) | Error::InvalidTransition(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
