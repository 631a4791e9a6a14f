//! Command executor
//!
//! Runs one [`Command`] end to end: token, request, dispatch, envelope,
//! typed result or typed error.

use std::sync::Arc;
use std::time::Duration;

use marketo_domain::{
    Command, ConnectionContext, ContentType, ExecutorConfig, HttpMethod, ResponseEnvelope,
};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::auth::TokenProvider;
use super::errors::ApiError;
use super::params::ParameterProcessor;
use crate::http::HttpClient;

const APPLICATION_JSON: &str = "application/json";
const FORM_URLENCODED_UTF8: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// Executes commands against one API instance.
///
/// Immutable after construction and safe to share between tasks; the only
/// shared state is the HTTP client and the token provider.
pub struct CommandExecutor {
    http_client: HttpClient,
    auth: Arc<dyn TokenProvider>,
    connection: ConnectionContext,
}

impl CommandExecutor {
    /// Create an executor with default timeouts
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created
    pub fn new(
        connection: ConnectionContext,
        auth: Arc<dyn TokenProvider>,
    ) -> Result<Self, ApiError> {
        Self::builder().connection(connection).auth(auth).build()
    }

    /// Create an executor from loaded configuration
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created
    pub fn from_config(
        config: ExecutorConfig,
        auth: Arc<dyn TokenProvider>,
    ) -> Result<Self, ApiError> {
        Self::builder()
            .connection_timeout(config.connection_timeout())
            .socket_read_timeout(config.socket_read_timeout())
            .connection(config.connection)
            .auth(auth)
            .build()
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> CommandExecutorBuilder {
        CommandExecutorBuilder::default()
    }

    pub fn connection(&self) -> &ConnectionContext {
        &self.connection
    }

    /// Execute a command and return its decoded result
    ///
    /// # Errors
    ///
    /// - [`ApiError::Authentication`] if the token provider fails
    /// - [`ApiError::Transport`] / [`ApiError::HttpStatus`] for network
    ///   failures, non-2xx responses and undecodable bodies
    /// - [`ApiError::RequestLimitExceeded`] if any reported error is a
    ///   request-limit code
    /// - [`ApiError::Api`] with the first reported error otherwise, or when
    ///   a parameter cannot be serialized
    #[instrument(skip(self, command), fields(method = %command.method(), path = %command.path()))]
    pub async fn execute<T: DeserializeOwned>(&self, command: &Command<T>) -> Result<T, ApiError> {
        let token =
            self.auth.authenticate(&self.connection).await.map_err(ApiError::Authentication)?;

        let request = self
            .build_request(command)?
            .header(AUTHORIZATION, format!("Bearer {}", token.access_token))
            .header(ACCEPT, APPLICATION_JSON);

        let response = self.http_client.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => format!("<failed to read response body: {err}>"),
            };
            warn!(%status, "API returned non-success HTTP status");
            return Err(ApiError::HttpStatus { status: status.as_u16(), body });
        }

        let envelope: ResponseEnvelope<T> = response.json().await?;

        if envelope.success {
            info!(request_id = ?envelope.request_id, "command succeeded");
            return match envelope.result {
                Some(result) => Ok(result),
                // Commands declaring `()` or `Option<_>` accept a missing result
                None => serde_json::from_value(serde_json::Value::Null).map_err(|err| {
                    ApiError::Api {
                        code: None,
                        message: format!(
                            "successful response without result, expected {}: {err}",
                            command.result_type_name()
                        ),
                    }
                }),
            };
        }

        let err = ApiError::from_envelope(command, &envelope);
        warn!(
            request_id = ?envelope.request_id,
            code = ?err.code(),
            request_limit = err.is_request_limit(),
            errors = envelope.errors.len(),
            "command failed"
        );
        Err(err)
    }

    /// Build the request for `command`, without authentication headers
    fn build_request<T>(&self, command: &Command<T>) -> Result<RequestBuilder, ApiError> {
        let mut url = format!("{}{}", self.connection.rest_endpoint, command.path());

        match (command.method(), command.body_content_type()) {
            (HttpMethod::Get, _) => {
                let query = ParameterProcessor::query_string(command.params())?;
                if !query.is_empty() {
                    url.push('?');
                    url.push_str(&query);
                }
                debug!(url = %self.connection.rest_endpoint, "GET request");
                Ok(self.http_client.request(Method::GET, url))
            }
            (HttpMethod::Post, ContentType::Json) => {
                debug!("POST request with JSON body");
                let body = ParameterProcessor::json_body(command.params())?;
                Ok(self.http_client.request(Method::POST, url).json(&body))
            }
            (HttpMethod::Post, ContentType::Form) => {
                debug!("POST request with form body");
                let body = ParameterProcessor::form_body(command.params())?;
                Ok(self
                    .http_client
                    .request(Method::POST, url)
                    .header(CONTENT_TYPE, FORM_URLENCODED_UTF8)
                    .body(body))
            }
            (other, _) => {
                debug!(method = %other, "request without body");
                Ok(self.http_client.request(to_reqwest_method(other), url))
            }
        }
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Builder for [`CommandExecutor`].
///
/// Timeouts are applied to the HTTP client once, when the executor is built.
#[derive(Default)]
pub struct CommandExecutorBuilder {
    connection: Option<ConnectionContext>,
    auth: Option<Arc<dyn TokenProvider>>,
    connection_timeout: Option<Duration>,
    socket_read_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl CommandExecutorBuilder {
    pub fn connection(mut self, connection: ConnectionContext) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Set the token provider
    pub fn auth(mut self, auth: Arc<dyn TokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = Some(timeout);
        self
    }

    pub fn socket_read_timeout(mut self, timeout: Duration) -> Self {
        self.socket_read_timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the executor
    ///
    /// # Errors
    ///
    /// Returns error if required fields are missing or client creation fails
    pub fn build(self) -> Result<CommandExecutor, ApiError> {
        let connection = self
            .connection
            .ok_or_else(|| ApiError::Config("Connection context not set".to_string()))?;
        let auth =
            self.auth.ok_or_else(|| ApiError::Config("Token provider not set".to_string()))?;

        let mut http = HttpClient::builder();
        if let Some(timeout) = self.connection_timeout {
            http = http.connect_timeout(timeout);
        }
        if let Some(timeout) = self.socket_read_timeout {
            http = http.read_timeout(timeout);
        }
        if let Some(agent) = self.user_agent {
            http = http.user_agent(agent);
        }

        Ok(CommandExecutor { http_client: http.build()?, auth, connection })
    }
}
