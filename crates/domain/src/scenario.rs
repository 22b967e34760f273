//! Scenario definitions.
//!
//! A scenario is one request plus the assertions its response must satisfy.
//! Strings and JSON bodies may reference fixture variables as `{{name}}`.

use serde::{Deserialize, Serialize};

use crate::request::{Header, Headers, HttpMethod, QueryParam, QueryParams, RequestBody};
use crate::testing::Assertion;

/// A named behavioral expectation against the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Group the scenario belongs to (e.g., "Find Pet by ID").
    pub group: String,
    /// Scenario name within its group.
    pub name: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the base URL; interpolated verbatim.
    pub path: String,
    /// Query parameters.
    #[serde(default)]
    pub query: QueryParams,
    /// Request headers.
    #[serde(default)]
    pub headers: Headers,
    /// Request body.
    #[serde(default)]
    pub body: RequestBody,
    /// Assertions evaluated against the response.
    #[serde(default)]
    pub assertions: Vec<Assertion>,
}

impl Scenario {
    /// Creates a scenario with no parameters, body or assertions.
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        method: HttpMethod,
        path: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            method,
            path: path.into(),
            query: QueryParams::new(),
            headers: Headers::new(),
            body: RequestBody::none(),
            assertions: Vec::new(),
        }
    }

    /// Adds a query parameter (builder pattern).
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.add(QueryParam::new(key, value));
        self
    }

    /// Adds a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(Header::new(name, value));
        self
    }

    /// Sets a JSON body (builder pattern).
    #[must_use]
    pub fn with_json(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::json(value);
        self
    }

    /// Expects an exact status code (builder pattern).
    #[must_use]
    pub fn expect_status(self, code: u16) -> Self {
        self.expect(Assertion::status(code))
    }

    /// Adds an assertion (builder pattern).
    #[must_use]
    pub fn expect(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Returns "group > name", the label used in reports and logs.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} > {}", self.group, self.name)
    }
}
