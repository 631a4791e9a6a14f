//! # Marketo Domain
//!
//! Data types shared by the Marketo REST command executor.
//!
//! This crate contains:
//! - Commands describing one REST call (method, path, parameters, result type)
//! - Parameter values, including the structured values that travel as JSON
//!   text
//! - The generic response envelope and its error records
//! - Connection and executor configuration structures
//! - Domain constants (reserved request-limit error codes, timeouts)
//!
//! ## Architecture
//! - No dependencies on other Marketo crates
//! - No I/O: everything here is plain data
//! - Transport, authentication and error translation live in `marketo-infra`

pub mod command;
pub mod config;
pub mod constants;
pub mod envelope;
pub mod params;

// Re-export commonly used items
pub use command::{Command, ContentType, HttpMethod};
pub use config::{ConnectionContext, ExecutorConfig};
pub use envelope::{ErrorRecord, ResponseEnvelope};
pub use params::{JsonParam, ParamValue, Parameters};
