use std::fmt;
use thiserror::Error;

/// Message shown when the server did not supply one.
pub const GENERIC_FAILURE: &str = "Request failed.";

/// Every failure a view or the login form can observe.
///
/// `Validation` is rendered inline next to the form field; `MissingCredential` is
/// resolved by redirecting to login. Everything else ends up in a single error
/// banner for the current view.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Not signed in: no session token is stored. Please log in.")]
    MissingCredential,
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or(GENERIC_FAILURE))]
    Unauthorized { message: Option<String> },
    #[error("Invalid input: {0}")]
    Validation(FieldErrors),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {}", .message.as_deref().unwrap_or(GENERIC_FAILURE))]
    Server {
        status: u16,
        message: Option<String>,
    },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Login failed: the server did not return a session token.")]
    LoginRejected,
    #[error("A login request is already in progress.")]
    SubmissionInFlight,
}

impl ApiError {
    /// Server-supplied message when there is one, otherwise `fallback`.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            Self::Unauthorized { message: Some(message) }
            | Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    #[must_use]
    pub const fn is_missing_credential(&self) -> bool {
        matches!(self, Self::MissingCredential)
    }
}

/// Per-field client-side validation messages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub fields: Vec<(&'static str, String)>,
}

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push((field, message.into()));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First message recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .fields
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        formatter.write_str(&joined)
    }
}
