//! Response testing and assertions.
//!
//! This module provides the assertion vocabulary a scenario uses to judge a
//! response: an exact status code and predicates over the JSON body.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A test assertion to run against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Response status equals this code exactly.
    StatusCode {
        /// Expected status code.
        expected: u16,
    },
    /// Body is an object containing at least these fields.
    JsonContains {
        /// Field expectations; extra fields in the body are ignored.
        fields: Vec<FieldExpectation>,
    },
    /// A top-level field exists and has the given JSON kind.
    JsonFieldKind {
        /// Field name.
        field: String,
        /// Expected kind.
        kind: JsonKind,
    },
    /// Body is a JSON array.
    JsonIsArray,
    /// Body is an empty JSON array.
    JsonIsEmptyArray,
    /// Body is an array and every element has `field == expected`.
    JsonEachField {
        /// Field name looked up on every element.
        field: String,
        /// Expected value.
        expected: Value,
    },
}

impl Assertion {
    /// Exact status code assertion.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode { expected: code }
    }

    /// Subset-equality assertion built from a JSON object literal.
    ///
    /// Non-object values produce an assertion with no fields, which only
    /// requires the body to be an object.
    #[must_use]
    pub fn contains(expected: &Value) -> Self {
        let fields = expected
            .as_object()
            .map(|map| {
                map.iter()
                    .map(|(name, value)| FieldExpectation::equals(name.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Self::JsonContains { fields }
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code = {expected}"),
            Self::JsonContains { fields } => {
                let parts: Vec<_> = fields.iter().map(FieldExpectation::description).collect();
                format!("Body contains {{{}}}", parts.join(", "))
            }
            Self::JsonFieldKind { field, kind } => format!("Field '{field}' is {kind}"),
            Self::JsonIsArray => "Body is an array".to_string(),
            Self::JsonIsEmptyArray => "Body is an empty array".to_string(),
            Self::JsonEachField { field, expected } => {
                format!("Every element has '{field}' = {expected}")
            }
        }
    }
}

/// The kind of a JSON value, for type-only checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JsonKind {
    /// `null`
    Null,
    /// `true` / `false`
    Bool,
    /// Integer or float.
    Number,
    /// String.
    String,
    /// Array.
    Array,
    /// Object.
    Object,
}

impl JsonKind {
    /// Returns the kind of `value`.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Returns the lowercase name used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl std::fmt::Display for JsonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "a {}", self.as_str())
    }
}

/// What a single field in a `JsonContains` assertion must satisfy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "match", content = "value", rename_all = "snake_case")]
pub enum FieldMatcher {
    /// Field equals this value exactly.
    Equals(Value),
    /// Field has this kind; the value itself is not compared.
    Kind(JsonKind),
}

impl FieldMatcher {
    /// Returns true if `actual` satisfies this matcher.
    #[must_use]
    pub fn matches(&self, actual: &Value) -> bool {
        match self {
            Self::Equals(expected) => actual == expected,
            Self::Kind(kind) => JsonKind::of(actual) == *kind,
        }
    }
}

impl std::fmt::Display for FieldMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equals(value) => write!(f, "{value}"),
            Self::Kind(kind) => write!(f, "<any {}>", kind.as_str()),
        }
    }
}

/// A named field and the matcher it must satisfy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldExpectation {
    /// Top-level field name.
    pub name: String,
    /// Matcher for the field's value.
    pub matcher: FieldMatcher,
}

impl FieldExpectation {
    /// Field must equal `value`.
    #[must_use]
    pub fn equals(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            matcher: FieldMatcher::Equals(value),
        }
    }

    /// Field must be of `kind`.
    #[must_use]
    pub fn kind(name: impl Into<String>, kind: JsonKind) -> Self {
        Self {
            name: name.into(),
            matcher: FieldMatcher::Kind(kind),
        }
    }

    fn description(&self) -> String {
        format!("{}: {}", self.name, self.matcher)
    }
}

/// Result of running a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionResult {
    /// The assertion that was run.
    pub assertion: Assertion,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Expected value (for diffs).
    pub expected: Option<String>,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl AssertionResult {
    /// Create a passed result.
    #[must_use]
    pub const fn pass(assertion: Assertion) -> Self {
        Self {
            assertion,
            passed: true,
            expected: None,
            actual: None,
            error: None,
        }
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(assertion: Assertion, actual: impl Into<String>) -> Self {
        Self {
            actual: Some(actual.into()),
            ..Self::pass(assertion)
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(assertion: Assertion, error: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: false,
            expected: None,
            actual: None,
            error: Some(error.into()),
        }
    }

    /// Create a failed result with the offending actual value.
    #[must_use]
    pub fn fail_with_actual(
        assertion: Assertion,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            actual: Some(actual.into()),
            ..Self::fail(assertion, error)
        }
    }

    /// Create a failed result carrying both sides of the comparison.
    #[must_use]
    pub fn fail_with_diff(
        assertion: Assertion,
        expected: impl Into<String>,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            expected: Some(expected.into()),
            actual: Some(actual.into()),
            ..Self::fail(assertion, error)
        }
    }
}

/// Results from evaluating all assertions of one scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestResults {
    /// Scenario that was evaluated.
    pub scenario_name: String,
    /// Individual assertion results.
    pub results: Vec<AssertionResult>,
    /// Total number of assertions.
    pub total: usize,
    /// Number of passed assertions.
    pub passed: usize,
    /// Number of failed assertions.
    pub failed: usize,
}

impl TestResults {
    /// Create new test results.
    #[must_use]
    pub fn new(scenario_name: impl Into<String>, results: Vec<AssertionResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();

        Self {
            scenario_name: scenario_name.into(),
            results,
            total,
            passed,
            failed: total - passed,
        }
    }

    /// Check if all assertions passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Returns the failed assertion results.
    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_contains_from_object_literal() {
        let assertion = Assertion::contains(&json!({"name": "KOER", "status": "available"}));
        assert_eq!(
            assertion,
            Assertion::JsonContains {
                fields: vec![
                    FieldExpectation::equals("name", json!("KOER")),
                    FieldExpectation::equals("status", json!("available")),
                ],
            }
        );
    }

    #[test]
    fn test_field_matcher() {
        assert!(FieldMatcher::Kind(JsonKind::Number).matches(&json!(9_876_543_210_i64)));
        assert!(FieldMatcher::Kind(JsonKind::Number).matches(&json!(1.5)));
        assert!(!FieldMatcher::Kind(JsonKind::Number).matches(&json!("1")));
        assert!(FieldMatcher::Equals(json!([])).matches(&json!([])));
        assert!(!FieldMatcher::Equals(json!([])).matches(&json!(["x"])));
    }

    #[test]
    fn test_assertion_description() {
        assert_eq!(Assertion::status(200).description(), "Status code = 200");

        let assertion = Assertion::JsonContains {
            fields: vec![
                FieldExpectation::kind("id", JsonKind::Number),
                FieldExpectation::equals("tags", json!([])),
            ],
        };
        assert_eq!(
            assertion.description(),
            "Body contains {id: <any number>, tags: []}"
        );
    }

    #[test]
    fn test_assertion_serde_shape() {
        let assertion = Assertion::JsonEachField {
            field: "status".to_string(),
            expected: json!("sold"),
        };
        let value = serde_json::to_value(&assertion).unwrap_or_default();
        assert_eq!(
            value,
            json!({"type": "json_each_field", "field": "status", "expected": "sold"})
        );
    }

    #[test]
    fn test_test_results() {
        let results = vec![
            AssertionResult::pass(Assertion::status(200)),
            AssertionResult::fail_with_diff(Assertion::JsonIsEmptyArray, "[]", "[{}]", "not empty"),
        ];

        let test_results = TestResults::new("Scenario", results);
        assert_eq!(test_results.total, 2);
        assert_eq!(test_results.passed, 1);
        assert_eq!(test_results.failed, 1);
        assert!(!test_results.all_passed());
        assert_eq!(test_results.failures().count(), 1);
    }
}
