//! HTTP Client port

use std::future::Future;
use std::pin::Pin;

use petstore_domain::{request::RequestSpec, response::ResponseSpec};
use thiserror::Error;

/// Transport failures, classified so reports can name the cause.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The request did not complete in time.
    #[error(
        "request timed out after {}",
        .timeout_ms.map_or_else(|| "the transport default".to_string(), |ms| format!("{ms} ms"))
    )]
    Timeout {
        /// Timeout that elapsed; `None` when only the transport default applied.
        timeout_ms: Option<u64>,
    },

    /// The host name could not be resolved.
    #[error("could not resolve host '{host}': {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying message.
        message: String,
    },

    /// The remote end refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Any other connection-level failure (TLS, reset, ...).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be encoded.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// Anything the transport reports that fits no other variant.
    #[error("{0}")]
    Other(String),
}

/// Boxed future returned by [`HttpClient::execute`].
pub type HttpFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ResponseSpec, HttpClientError>> + Send + 'a>>;

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing
/// the application layer to be independent of specific HTTP libraries.
pub trait HttpClient: Send + Sync {
    /// Executes an HTTP request and returns the response.
    ///
    /// Any status code, including 4xx and 5xx, is a successful call; only
    /// transport failures are errors.
    fn execute(&self, request: &RequestSpec) -> HttpFuture<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_timeout_message() {
        let configured = HttpClientError::Timeout {
            timeout_ms: Some(5_000),
        };
        assert_eq!(configured.to_string(), "request timed out after 5000 ms");

        let transport = HttpClientError::Timeout { timeout_ms: None };
        assert_eq!(
            transport.to_string(),
            "request timed out after the transport default"
        );
    }
}
