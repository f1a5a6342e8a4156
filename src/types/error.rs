use serde::Serialize;
use std::fmt::Display;

/// Public error body returned by every failing endpoint.
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Error {
    Internal,
    NotFound { message: String },
    Conflict { message: String },
    InvalidFormBody { errors: validator::ValidationErrors },
    InvalidRequest { message: String },
    ReadonlyMode,
}

impl Error {
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Internal => f.write_str("Failed to perform request"),
            Error::NotFound { message }
            | Error::Conflict { message }
            | Error::InvalidRequest { message } => f.write_str(message),
            Error::InvalidFormBody { .. } => f.write_str("User performed request with invalid body"),
            Error::ReadonlyMode => f.write_str("Attempt to write read-only database"),
        }
    }
}
