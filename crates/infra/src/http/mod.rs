//! HTTP transport shared by every command

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
