//! Error types for integration-hub
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Errors fall into two families:
//! - precondition violations, detected locally before any network call
//! - backend/transport failures, raised by the HTTP layer

use thiserror::Error;

/// The main error type for integration-hub
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Precondition Errors
    // ============================================================================
    #[error("No credentials found. Please connect to the integration first.")]
    MissingCredentials,

    #[error("No more data to load.")]
    NoMoreData,

    #[error("A load is already in progress.")]
    LoadInProgress,

    #[error("Cannot {action} while {state}")]
    InvalidState { action: String, state: String },

    #[error("Missing identity field: {field}")]
    MissingIdentity { field: String },

    #[error("Unknown integration: {name}")]
    UnknownIntegration { name: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{}", backend_message(.status, .detail))]
    Backend { status: u16, detail: Option<String> },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("No credentials returned by {integration}")]
    CredentialsUnavailable { integration: String },

    // ============================================================================
    // Authorization Surface Errors
    // ============================================================================
    #[error("Could not open authorization window: {message}")]
    Surface { message: String },

    // ============================================================================
    // State Errors
    // ============================================================================
    #[error("State error: {message}")]
    State { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

fn backend_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!("HTTP {status}: {detail}"),
        None => format!("Request failed with status code {status}"),
    }
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(action: impl Into<String>, state: impl std::fmt::Display) -> Self {
        Self::InvalidState {
            action: action.into(),
            state: state.to_string(),
        }
    }

    /// Create a missing identity error
    pub fn missing_identity(field: impl Into<String>) -> Self {
        Self::MissingIdentity {
            field: field.into(),
        }
    }

    /// Create a backend status error
    pub fn backend(status: u16, detail: Option<String>) -> Self {
        Self::Backend { status, detail }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an authorization surface error
    pub fn surface(message: impl Into<String>) -> Self {
        Self::Surface {
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Backend-provided detail message, if the backend sent one
    pub fn detail(&self) -> Option<&str> {
        match self {
            Error::Backend {
                detail: Some(detail),
                ..
            } => Some(detail.as_str()),
            _ => None,
        }
    }

    /// Human-readable message for the user.
    ///
    /// Prefers the backend detail, then `fallback`, then the error's own text.
    pub fn user_message(&self, fallback: Option<&str>) -> String {
        if self.is_precondition() {
            return self.to_string();
        }
        match (self.detail(), fallback) {
            (Some(detail), _) => detail.to_string(),
            (None, Some(fallback)) => fallback.to_string(),
            (None, None) => self.to_string(),
        }
    }

    /// Check if this error was raised locally, before any network call
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::MissingCredentials
                | Error::NoMoreData
                | Error::LoadInProgress
                | Error::InvalidState { .. }
                | Error::MissingIdentity { .. }
        )
    }
}

/// Result type alias for integration-hub
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
