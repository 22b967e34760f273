//! Resolve scenario use case.
//!
//! Turns a [`Scenario`] template plus the suite fixture into a concrete
//! [`RequestSpec`] and the assertions to evaluate against its response.

use std::collections::BTreeSet;

use petstore_domain::request::{Header, QueryParam, RequestBody, RequestSpec};
use petstore_domain::testing::{Assertion, FieldMatcher};
use petstore_domain::{Scenario, SuiteFixture};
use thiserror::Error;

use crate::variable_resolver::{VariableResolver, extract_variable_names};

/// Errors raised before a scenario request can be sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The scenario references fixture variables that setup did not bind.
    #[error("unresolved variables: {}", .0.join(", "))]
    UnresolvedVariables(Vec<String>),

    /// The resolved URL does not parse.
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl {
        /// URL after resolution.
        url: String,
        /// Parser message.
        message: String,
    },
}

/// A scenario with every variable substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScenario {
    /// Request ready for the HTTP port.
    pub request: RequestSpec,
    /// Assertions with expected values resolved.
    pub assertions: Vec<Assertion>,
}

/// Use case that binds scenario templates to a base URL and fixture.
#[derive(Debug, Clone)]
pub struct ResolveScenario {
    base_url: String,
    timeout_ms: Option<u64>,
}

impl ResolveScenario {
    /// Creates a resolver for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: None,
        }
    }

    /// Applies a timeout to every resolved request.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the fixture variables a scenario depends on.
    ///
    /// A non-empty set means the scenario must run after setup.
    #[must_use]
    pub fn required_variables(scenario: &Scenario) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        names.extend(extract_variable_names(&scenario.path));
        for param in scenario.query.iter() {
            names.extend(extract_variable_names(&param.value));
        }
        for header in scenario.headers.iter() {
            names.extend(extract_variable_names(&header.value));
        }
        if let RequestBody::Json(value) = &scenario.body {
            collect_json_names(value, &mut names);
        }
        for assertion in &scenario.assertions {
            for value in assertion_values(assertion) {
                collect_json_names(value, &mut names);
            }
        }
        names
    }

    /// Resolves the scenario against `fixture`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnresolvedVariables`] listing every missing
    /// name, or [`ResolveError::InvalidUrl`] if the joined URL is malformed.
    pub fn resolve(
        &self,
        scenario: &Scenario,
        fixture: &SuiteFixture,
    ) -> Result<ResolvedScenario, ResolveError> {
        let missing: Vec<String> = Self::required_variables(scenario)
            .into_iter()
            .filter(|name| fixture.get(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ResolveError::UnresolvedVariables(missing));
        }

        let resolver = VariableResolver::new(fixture);

        let path = resolver.resolve(&scenario.path).resolved;
        let mut request = RequestSpec::new(
            scenario.full_name(),
            scenario.method,
            RequestSpec::join_url(&self.base_url, &path),
        );
        request.timeout_ms = self.timeout_ms;

        if let Err(e) = request.parse_url() {
            return Err(ResolveError::InvalidUrl {
                url: request.url,
                message: e.to_string(),
            });
        }

        request.query = scenario
            .query
            .iter()
            .map(|p| QueryParam::new(p.key.clone(), resolver.resolve(&p.value).resolved))
            .collect();
        request.headers = scenario
            .headers
            .iter()
            .map(|h| Header::new(h.name.clone(), resolver.resolve(&h.value).resolved))
            .collect();
        request.body = match &scenario.body {
            RequestBody::None => RequestBody::None,
            RequestBody::Json(value) => RequestBody::Json(resolver.resolve_json(value).value),
        };

        let assertions = scenario
            .assertions
            .iter()
            .map(|assertion| resolve_assertion(&resolver, assertion))
            .collect();

        Ok(ResolvedScenario {
            request,
            assertions,
        })
    }
}

fn collect_json_names(value: &serde_json::Value, names: &mut BTreeSet<String>) {
    match value {
        serde_json::Value::String(s) => names.extend(extract_variable_names(s)),
        serde_json::Value::Array(items) => {
            for item in items {
                collect_json_names(item, names);
            }
        }
        serde_json::Value::Object(map) => {
            for (key, item) in map {
                names.extend(extract_variable_names(key));
                collect_json_names(item, names);
            }
        }
        _ => {}
    }
}

/// Expected values an assertion compares against.
fn assertion_values(assertion: &Assertion) -> Vec<&serde_json::Value> {
    match assertion {
        Assertion::JsonEachField { expected: v, .. } => vec![v],
        Assertion::JsonContains { fields } => fields
            .iter()
            .filter_map(|f| match &f.matcher {
                FieldMatcher::Equals(v) => Some(v),
                FieldMatcher::Kind(_) => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn resolve_assertion(resolver: &VariableResolver<'_>, assertion: &Assertion) -> Assertion {
    let mut assertion = assertion.clone();
    match &mut assertion {
        Assertion::JsonEachField { expected: v, .. } => {
            *v = resolver.resolve_json(v).value;
        }
        Assertion::JsonContains { fields } => {
            for field in fields {
                if let FieldMatcher::Equals(v) = &mut field.matcher {
                    *v = resolver.resolve_json(v).value;
                }
            }
        }
        _ => {}
    }
    assertion
}
