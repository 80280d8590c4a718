use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(agendabot::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(agendabot::config))]
    Config(String),

    /// No listed calendar matched the selection. Callers treat this as "no data".
    #[error("No calendar matched the configured selection")]
    #[diagnostic(
        code(agendabot::no_matching_calendars),
        help("Check that the account has a primary calendar or one named like the shared calendar")
    )]
    NoMatchingCalendars,

    #[error("Calendar retrieval error: {0}")]
    #[diagnostic(code(agendabot::retrieval))]
    Retrieval(String),

    #[error("Classification error: {0}")]
    #[diagnostic(code(agendabot::classification))]
    Classification(String),

    #[error("Handler error: {0}")]
    #[diagnostic(code(agendabot::handler))]
    Handler(String),

    #[error("Language model error: {0}")]
    #[diagnostic(code(agendabot::llm))]
    Llm(String),

    #[error(transparent)]
    #[diagnostic(code(agendabot::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(agendabot::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(agendabot::other))]
    Other(String),
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Config(format!("Invalid URL: {}", err))
    }
}

/// Type alias for Result with our Error type
pub type BotResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create calendar retrieval errors
pub fn retrieval_error(message: &str) -> Error {
    Error::Retrieval(message.to_string())
}

/// Helper to create classification errors
pub fn classification_error(message: &str) -> Error {
    Error::Classification(message.to_string())
}

/// Helper to create handler errors
pub fn handler_error(message: &str) -> Error {
    Error::Handler(message.to_string())
}

/// Helper to create language model errors
pub fn llm_error(message: &str) -> Error {
    Error::Llm(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
