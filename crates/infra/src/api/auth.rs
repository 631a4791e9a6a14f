//! API authentication seam
//!
//! The executor asks a [`TokenProvider`] for a bearer token before every
//! call. Token refresh and caching are the provider's business.

use std::fmt;

use async_trait::async_trait;
use marketo_domain::constants::REDACTED;
use marketo_domain::ConnectionContext;
use serde::{Deserialize, Serialize};

use super::errors::BoxError;

/// Access token as returned by the identity endpoint
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Remaining lifetime in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into(), token_type: None, expires_in: None, scope: None }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &REDACTED)
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Trait for providing access tokens
///
/// Implementations may perform network calls and cache tokens; they must be
/// safe to call from concurrent `execute` invocations. Errors are surfaced
/// to the caller unchanged.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Get a valid access token for `connection`
    async fn authenticate(&self, connection: &ConnectionContext) -> Result<AccessToken, BoxError>;
}
