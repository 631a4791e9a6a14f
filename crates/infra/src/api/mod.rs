//! Marketo REST command execution
//!
//! This module turns typed commands into authenticated HTTP calls and
//! decodes the API's response envelope into the command's result type.
//!
//! # Architecture
//!
//! - [`TokenProvider`] supplies a bearer token for every call
//! - [`ParameterProcessor`] maps parameters to query strings and bodies
//! - [`CommandExecutor`] dispatches through [`crate::http::HttpClient`]
//! - [`ApiError`] separates request-limit errors from other API errors
//!
//! The executor never retries; callers key backoff off
//! [`ApiError::is_request_limit`].

pub mod auth;
pub mod errors;
pub mod executor;
pub mod params;

pub use auth::{AccessToken, TokenProvider};
pub use errors::{ApiError, ApiErrorCategory, BoxError};
pub use executor::{CommandExecutor, CommandExecutorBuilder};
pub use params::{ParameterProcessor, ProcessedParameters, ProcessedValue};
