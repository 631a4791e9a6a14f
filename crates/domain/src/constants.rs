//! Domain constants
//!
//! Centralized location for the constants shared by the executor and its
//! configuration.

/// Error codes the API reserves for request-limit failures.
///
/// - `606`: rate limit (requests per 20 seconds)
/// - `607`: daily quota
/// - `615`: concurrent request limit
pub const REQUEST_LIMIT_ERROR_CODES: [&str; 3] = ["606", "607", "615"];

// Transport timeouts
pub const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_SOCKET_READ_TIMEOUT_MS: u64 = 30_000;

/// Placeholder shown instead of credentials in `Debug` output.
pub const REDACTED: &str = "[REDACTED]";

/// Returns `true` when `code` is one of [`REQUEST_LIMIT_ERROR_CODES`].
pub fn is_request_limit_code(code: &str) -> bool {
    REQUEST_LIMIT_ERROR_CODES.contains(&code)
}
