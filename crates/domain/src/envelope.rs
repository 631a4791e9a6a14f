//! Response envelope
//!
//! Every REST call answers with the same wrapper:
//!
//! ```json
//! { "requestId": "…", "success": false, "errors": [{ "code": "606", "message": "…" }] }
//! ```
//!
//! The `result` payload is generic; its concrete type comes from the command
//! that was executed.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::constants::is_request_limit_code;

/// One error reported by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Provider-defined code, kept opaque
    #[serde(deserialize_with = "code_from_string_or_number")]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl ErrorRecord {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: code.into(), message: message.into() }
    }

    /// Rate limit, daily quota or concurrency limit
    pub fn is_request_limit(&self) -> bool {
        is_request_limit_code(&self.code)
    }
}

/// Generic wrapper around every API response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope<T> {
    #[serde(default)]
    pub request_id: Option<String>,
    pub success: bool,
    /// Present iff `success`
    pub result: Option<T>,
    /// Present iff not `success`
    #[serde(default)]
    pub errors: Vec<ErrorRecord>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl<T> ResponseEnvelope<T> {
    /// First error whose code is a request-limit code
    pub fn request_limit_error(&self) -> Option<&ErrorRecord> {
        self.errors.iter().find(|error| error.is_request_limit())
    }

    pub fn first_error(&self) -> Option<&ErrorRecord> {
        self.errors.first()
    }
}

fn code_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(code) => Ok(code),
        Value::Number(code) => Ok(code.to_string()),
        other => Err(D::Error::custom(format!("invalid error code: {other}"))),
    }
}
