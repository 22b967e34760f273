//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It performs every network call the harness makes.

use std::collections::HashMap;
use std::error::Error as _;
use std::time::{Duration, Instant};

use petstore_application::ports::{HttpClient, HttpClientError, HttpFuture};
use petstore_domain::{
    request::{HttpMethod, RequestSpec},
    response::ResponseSpec,
};
use reqwest::{Client, Method, Url};
use tracing::trace;

/// HTTP client implementation using reqwest.
///
/// Wraps `reqwest::Client` and implements the `HttpClient` port from the
/// application layer. Redirects are not followed so the scenario sees the
/// status the service actually returned.
pub struct ReqwestHttpClient {
    client: Client,
    timeout_ms: Option<u64>,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client.
    ///
    /// Without a timeout the transport's default applies.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(user_agent: &str, timeout_ms: Option<u64>) -> Result<Self, HttpClientError> {
        let mut builder = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::none());
        if let Some(ms) = timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client, timeout_ms })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Parses the URL and appends the query parameters.
    fn build_url(request: &RequestSpec) -> Result<Url, HttpClientError> {
        let mut url = Url::parse(&request.url)
            .map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {}", request.url)))?;
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in request.query.iter() {
                pairs.append_pair(&param.key, &param.value);
            }
        }
        Ok(url)
    }

    /// Maps reqwest errors to the port's `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: Option<u64>) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let message = error_chain(error);
        let host = error
            .url()
            .and_then(|u| u.host_str())
            .unwrap_or("unknown")
            .to_string();

        if error.is_connect() {
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError { host, message };
            }
            if lower.contains("refused") {
                let port = error
                    .url()
                    .and_then(Url::port_or_known_default)
                    .unwrap_or(80);
                return HttpClientError::ConnectionRefused { host, port };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        HttpClientError::Other(message)
    }
}

/// Joins an error and all its sources; reqwest's `Display` omits the cause.
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl HttpClient for ReqwestHttpClient {
    fn execute(&self, request: &RequestSpec) -> HttpFuture<'_> {
        let method = request.method;
        let url = Self::build_url(request);
        let headers: Vec<_> = request
            .headers
            .iter()
            .map(|h| (h.name.clone(), h.value.clone()))
            .collect();
        let content_type = request.body.content_type();
        let has_content_type = request.headers.contains("content-type");
        let body = request
            .body
            .to_bytes()
            .map_err(|e| HttpClientError::InvalidBody(e.to_string()));
        let has_body = !request.body.is_empty();
        let timeout_ms = request.timeout_ms;

        Box::pin(async move {
            let url = url?;
            let body = body?;

            let mut builder = self.client.request(Self::to_reqwest_method(method), url);
            if let Some(ms) = timeout_ms {
                builder = builder.timeout(Duration::from_millis(ms));
            }

            for (name, value) in &headers {
                builder = builder.header(name, value);
            }

            if let Some(content_type) = content_type {
                if !has_content_type {
                    builder = builder.header("Content-Type", content_type);
                }
            }

            if has_body {
                builder = builder.body(body);
            }

            let start = Instant::now();
            let effective_timeout = timeout_ms.or(self.timeout_ms);
            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, effective_timeout))?;

            let status = response.status().as_u16();
            let response_headers: HashMap<String, String> = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
                .collect();

            let body_bytes = response
                .bytes()
                .await
                .map_err(|e| Self::map_error(&e, effective_timeout))?;
            let duration = start.elapsed();

            trace!(status, bytes = body_bytes.len(), "response body read");

            Ok(ResponseSpec::new(
                status,
                response_headers,
                &body_bytes,
                duration,
            ))
        })
    }
}
