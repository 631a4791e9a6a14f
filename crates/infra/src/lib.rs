//! # Marketo Infrastructure
//!
//! Transport side of the Marketo REST command executor.
//!
//! This crate contains:
//! - The HTTP client wrapper with connect/read timeouts
//! - The token provider seam used to authenticate each call
//! - Parameter processing into query strings, JSON and form bodies
//! - The command executor and its error taxonomy
//! - Configuration loading from environment variables or files
//!
//! ## Architecture
//! - Depends on `marketo-domain` for commands, envelopes and config types
//! - Contains all I/O (HTTP, environment, files)

pub mod api;
pub mod config;
pub mod http;

// Re-export commonly used items
pub use api::{
    AccessToken, ApiError, ApiErrorCategory, BoxError, CommandExecutor, CommandExecutorBuilder,
    ParameterProcessor, ProcessedParameters, ProcessedValue, TokenProvider,
};
pub use http::{HttpClient, HttpClientBuilder};
