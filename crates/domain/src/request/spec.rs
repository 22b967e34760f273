//! Request specification type

use serde::{Deserialize, Serialize};
use url::Url;

use super::{Header, Headers, HttpMethod, QueryParam, QueryParams, RequestBody};

/// Complete specification for a single HTTP call, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// Human-readable name (usually the scenario name)
    pub name: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute target URL, without the query string
    pub url: String,
    /// HTTP headers
    #[serde(default)]
    pub headers: Headers,
    /// Query parameters, appended by the transport
    #[serde(default)]
    pub query: QueryParams,
    /// Request body
    #[serde(default)]
    pub body: RequestBody,
    /// Per-request timeout; `None` keeps the transport default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl RequestSpec {
    /// Creates a request with no headers, query or body.
    #[must_use]
    pub fn new(name: impl Into<String>, method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            url: url.into(),
            headers: Headers::new(),
            query: QueryParams::new(),
            body: RequestBody::none(),
            timeout_ms: None,
        }
    }

    /// Creates a GET request with the given URL.
    #[must_use]
    pub fn get(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Get, url)
    }

    /// Adds a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(Header::new(name, value));
        self
    }

    /// Adds a query parameter (builder pattern).
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.add(QueryParam::new(key, value));
        self
    }

    /// Sets a JSON body (builder pattern).
    #[must_use]
    pub fn with_json(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::json(value);
        self
    }

    /// Joins a base URL and a path with exactly one `/` between them.
    ///
    /// A trailing `/` on the path is kept: `/pet/` and `/pet` are different
    /// endpoints on the remote service.
    #[must_use]
    pub fn join_url(base_url: &str, path: &str) -> String {
        let base = base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        }
    }

    /// Validates the URL and returns parsed version if valid.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed.
    pub fn parse_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.url)
    }
}
