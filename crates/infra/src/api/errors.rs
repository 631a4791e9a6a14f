//! API-specific error types
//!
//! Translates failed response envelopes into typed errors and classifies
//! every failure so callers can decide on backoff.

use marketo_domain::{Command, ErrorRecord, ResponseEnvelope};
use thiserror::Error;

/// Boxed error returned by token providers
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Categories of API errors for caller-side retry logic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Request-limit codes (606, 607, 615) - back off before retrying
    RequestLimit,
    /// Provider-reported failure or unserializable parameters
    Api,
    /// Network/connection errors and non-2xx responses
    Transport,
    /// Token provider failures
    Authentication,
    /// Configuration errors - non-retryable
    Config,
}

/// Errors raised while executing a command
#[derive(Debug, Error)]
pub enum ApiError {
    /// Generic provider failure; only the first reported error is kept
    #[error("{message}")]
    Api { code: Option<String>, message: String },

    /// Rate limit, daily quota or concurrency limit reached
    #[error("{message}")]
    RequestLimitExceeded { code: String, message: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error(transparent)]
    Authentication(BoxError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Api { .. } => ApiErrorCategory::Api,
            Self::RequestLimitExceeded { .. } => ApiErrorCategory::RequestLimit,
            Self::Transport(_) | Self::HttpStatus { .. } => ApiErrorCategory::Transport,
            Self::Authentication(_) => ApiErrorCategory::Authentication,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Provider error code, when the API reported one
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            Self::RequestLimitExceeded { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_request_limit(&self) -> bool {
        matches!(self, Self::RequestLimitExceeded { .. })
    }

    /// Wrap a parameter encoding failure
    pub(crate) fn serialization(err: impl std::fmt::Display) -> Self {
        Self::Api { code: None, message: err.to_string() }
    }

    /// Build the error for a failed envelope.
    ///
    /// A request-limit error anywhere in the list wins; otherwise the first
    /// error is reported and the rest are dropped.
    pub(crate) fn from_envelope<T, R>(
        command: &Command<T>,
        envelope: &ResponseEnvelope<R>,
    ) -> Self {
        if let Some(limit) = envelope.request_limit_error() {
            return Self::RequestLimitExceeded {
                code: limit.code.clone(),
                message: describe(command, &limit.message),
            };
        }

        match envelope.first_error() {
            Some(ErrorRecord { code, message }) => {
                Self::Api { code: Some(code.clone()), message: describe(command, message) }
            }
            None => Self::Api {
                code: None,
                message: describe(command, "request failed without error details"),
            },
        }
    }
}

/// `"<message> (<METHOD>:<path>, parameters=<parameters>)"`
fn describe<T>(command: &Command<T>, message: &str) -> String {
    format!(
        "{} ({}:{}, parameters={})",
        message,
        command.method(),
        command.path(),
        command.params()
    )
}
