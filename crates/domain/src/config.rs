//! Connection and executor configuration

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CONNECTION_TIMEOUT_MS, DEFAULT_SOCKET_READ_TIMEOUT_MS, REDACTED};

/// Endpoints and client credentials of one API instance.
///
/// Handed to the token provider on every call; the provider decides whether
/// to cache tokens.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionContext {
    /// OAuth identity endpoint (e.g. `https://123-ABC-456.mktorest.com/identity`)
    pub identity_endpoint: String,
    /// REST base URL (e.g. `https://123-ABC-456.mktorest.com`)
    pub rest_endpoint: String,
    pub client_id: String,
    pub client_secret: String,
}

impl ConnectionContext {
    pub fn new(
        identity_endpoint: impl Into<String>,
        rest_endpoint: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            identity_endpoint: identity_endpoint.into(),
            rest_endpoint: rest_endpoint.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for ConnectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionContext")
            .field("identity_endpoint", &self.identity_endpoint)
            .field("rest_endpoint", &self.rest_endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &REDACTED)
            .finish()
    }
}

/// Executor configuration loaded from the environment or a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    pub connection: ConnectionContext,
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,
    #[serde(default = "default_socket_read_timeout_ms")]
    pub socket_read_timeout_ms: u64,
}

impl ExecutorConfig {
    pub fn new(connection: ConnectionContext) -> Self {
        Self {
            connection,
            connection_timeout_ms: DEFAULT_CONNECTION_TIMEOUT_MS,
            socket_read_timeout_ms: DEFAULT_SOCKET_READ_TIMEOUT_MS,
        }
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    pub fn socket_read_timeout(&self) -> Duration {
        Duration::from_millis(self.socket_read_timeout_ms)
    }
}

fn default_connection_timeout_ms() -> u64 {
    DEFAULT_CONNECTION_TIMEOUT_MS
}

fn default_socket_read_timeout_ms() -> u64 {
    DEFAULT_SOCKET_READ_TIMEOUT_MS
}
