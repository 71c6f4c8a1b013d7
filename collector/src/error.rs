use std::time::Duration;

/// Failures that end a collection pass or, at startup, the process.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("The MongoDB connection string is empty")]
    EmptyConnectionString,
    #[error("Cannot connect to the MongoDB server: {0}")]
    Connection(#[source] mongodb::error::Error),
    #[error("The MongoDB server did not answer within {0:?}")]
    ConnectTimeout(Duration),
    #[error("Command {command} failed: {reason}")]
    Command { command: String, reason: String },
}

impl Error {
    pub fn command(command: impl Into<String>, reason: impl ToString) -> Self {
        Self::Command {
            command: command.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error is fatal at startup rather than scoped to one pass.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyConnectionString | Self::Connection(_) | Self::ConnectTimeout(_)
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A field that is missing or cannot be coerced. Never aborts a pass.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("value is missing")]
    Missing,
    #[error("{0} is not numeric")]
    NotNumeric(String),
    #[error("expected {0}")]
    Unexpected(&'static str),
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
