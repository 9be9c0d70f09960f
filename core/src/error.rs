//! Error types for the CloudBeaver admin client.
//!
//! # Design
//! A non-200 response lands in `HttpError` with the raw status code and body
//! for debugging; decoding is never attempted on it. A 200 response that
//! carries a GraphQL `errors` array is surfaced as `GraphQl` with the server
//! messages untouched. `Cardinality` is reserved for single-record lookups.

use thiserror::Error;

/// Errors returned by `TeamClient` operations and `parse_*` methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing credentials or other client-side misconfiguration. Raised
    /// before any network call is made.
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP exchange itself failed (connection refused, timeout, body
    /// could not be read).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a status other than 200.
    #[error("HTTP status {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The server answered 200 but reported GraphQL errors.
    #[error("graphql error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request envelope could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A single-record lookup matched zero or several records.
    #[error("expected {expected} team, got {actual}")]
    Cardinality { expected: usize, actual: usize },
}
