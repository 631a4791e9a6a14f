//! Configuration loader
//!
//! Environment variables win; when any required one is missing the loader
//! falls back to a `marketo.json` / `marketo.toml` file in the working
//! directory or next to the executable.
//!
//! Variables: `MARKETO_IDENTITY_URL`, `MARKETO_REST_URL`, `MARKETO_CLIENT_ID`,
//! `MARKETO_CLIENT_SECRET`, and optionally `MARKETO_CONNECT_TIMEOUT_MS` and
//! `MARKETO_READ_TIMEOUT_MS`.

use std::path::{Path, PathBuf};

use marketo_domain::constants::{DEFAULT_CONNECTION_TIMEOUT_MS, DEFAULT_SOCKET_READ_TIMEOUT_MS};
use marketo_domain::{ConnectionContext, ExecutorConfig};

use crate::api::errors::ApiError;

type Result<T> = std::result::Result<T, ApiError>;

const FILE_NAMES: [&str; 2] = ["marketo.json", "marketo.toml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ApiError::Config(format!(
                "Unsupported config format: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }

    fn parse(self, contents: &str) -> Result<ExecutorConfig> {
        match self {
            Self::Json => serde_json::from_str(contents)
                .map_err(|e| ApiError::Config(format!("Invalid JSON format: {e}"))),
            Self::Toml => toml::from_str(contents)
                .map_err(|e| ApiError::Config(format!("Invalid TOML format: {e}"))),
        }
    }
}

/// Load from the environment, falling back to a config file
///
/// # Errors
///
/// Returns `ApiError::Config` if neither source yields a complete config
pub fn load() -> Result<ExecutorConfig> {
    load_from_env().or_else(|err| {
        tracing::debug!(error = %err, "environment incomplete, trying config file");
        load_from_file(None)
    })
}

/// Load from `MARKETO_*` environment variables
///
/// # Errors
///
/// Returns `ApiError::Config` if a required variable is missing or a
/// timeout is not a number
pub fn load_from_env() -> Result<ExecutorConfig> {
    let config = ExecutorConfig {
        connection: ConnectionContext {
            identity_endpoint: env_var("MARKETO_IDENTITY_URL")?,
            rest_endpoint: env_var("MARKETO_REST_URL")?,
            client_id: env_var("MARKETO_CLIENT_ID")?,
            client_secret: env_var("MARKETO_CLIENT_SECRET")?,
        },
        connection_timeout_ms: env_millis(
            "MARKETO_CONNECT_TIMEOUT_MS",
            DEFAULT_CONNECTION_TIMEOUT_MS,
        )?,
        socket_read_timeout_ms: env_millis(
            "MARKETO_READ_TIMEOUT_MS",
            DEFAULT_SOCKET_READ_TIMEOUT_MS,
        )?,
    };
    tracing::info!("configuration loaded from environment");
    Ok(config)
}

/// Load from `path`, or from the first probed file when `path` is `None`.
/// The format follows the file extension.
///
/// # Errors
///
/// Returns `ApiError::Config` if the file is missing, unreadable or invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ExecutorConfig> {
    let path = match path {
        Some(path) if path.exists() => path,
        Some(path) => {
            return Err(ApiError::Config(format!("Config file not found: {}", path.display())))
        }
        None => probe_config_paths()
            .ok_or_else(|| ApiError::Config("No marketo config file found".to_string()))?,
    };

    let format = Format::of(&path)?;
    let contents = std::fs::read_to_string(&path)
        .map_err(|e| ApiError::Config(format!("Failed to read {}: {e}", path.display())))?;

    tracing::info!(path = %path.display(), "configuration loaded from file");
    format.parse(&contents)
}

/// First existing `marketo.{json,toml}` in the working directory, then next
/// to the executable
pub fn probe_config_paths() -> Option<PathBuf> {
    let exe_dir = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf));

    std::env::current_dir()
        .ok()
        .into_iter()
        .chain(exe_dir)
        .flat_map(|dir| FILE_NAMES.map(|name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| ApiError::Config(format!("Missing required environment variable: {key}")))
}

fn env_millis(key: &str, default: u64) -> Result<u64> {
    std::env::var(key).map_or(Ok(default), |value| {
        value.trim().parse().map_err(|e| ApiError::Config(format!("Invalid {key}: {e}")))
    })
}
