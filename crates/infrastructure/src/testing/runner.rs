//! Test runner implementation.
//!
//! Evaluates a scenario's assertions against its HTTP response.

use petstore_domain::response::ResponseSpec;
use petstore_domain::testing::{
    Assertion, AssertionResult, FieldExpectation, JsonKind, TestResults,
};
use serde_json::{Map, Value};

/// Longest body excerpt quoted in a failure message.
const PREVIEW_CHARS: usize = 200;

/// Test runner that executes assertions against responses.
#[derive(Debug, Default)]
pub struct TestRunner {
    /// Whether to stop on first failure.
    stop_on_failure: bool,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stop_on_failure: false,
        }
    }

    /// Set whether to stop on first failure.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Run all assertions of a scenario against a response.
    #[must_use]
    pub fn run(
        &self,
        scenario_name: &str,
        assertions: &[Assertion],
        response: &ResponseSpec,
    ) -> TestResults {
        let json = response.body_as_json().map_err(|e| e.to_string());
        let mut results = Vec::with_capacity(assertions.len());

        for assertion in assertions {
            let result = Self::evaluate(assertion, response, &json);
            let failed = !result.passed;
            results.push(result);

            if failed && self.stop_on_failure {
                break;
            }
        }

        TestResults::new(scenario_name, results)
    }

    /// Run a single assertion against a response.
    #[must_use]
    pub fn run_assertion(&self, assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        let json = response.body_as_json().map_err(|e| e.to_string());
        Self::evaluate(assertion, response, &json)
    }

    fn evaluate(
        assertion: &Assertion,
        response: &ResponseSpec,
        json: &Result<Value, String>,
    ) -> AssertionResult {
        match assertion {
            Assertion::StatusCode { expected } => {
                check_status_code(assertion, response, *expected)
            }
            _ => match json {
                Ok(body) => check_json(assertion, body),
                Err(e) => AssertionResult::fail_with_actual(
                    assertion.clone(),
                    response.body_preview(PREVIEW_CHARS),
                    format!("Failed to parse body as JSON: {e}"),
                ),
            },
        }
    }
}

fn check_status_code(
    assertion: &Assertion,
    response: &ResponseSpec,
    expected: u16,
) -> AssertionResult {
    let actual = response.status;
    if actual == expected {
        AssertionResult::pass_with_value(assertion.clone(), actual.to_string())
    } else {
        AssertionResult::fail_with_diff(
            assertion.clone(),
            format!("= {expected}"),
            response.status_code().to_string(),
            format!(
                "Expected status = {expected}, got {actual}: {}",
                response.body_preview(PREVIEW_CHARS)
            ),
        )
    }
}

fn check_json(assertion: &Assertion, body: &Value) -> AssertionResult {
    match assertion {
        Assertion::JsonContains { fields } => check_json_contains(assertion, body, fields),
        Assertion::JsonFieldKind { field, kind } => {
            check_json_field_kind(assertion, body, field, *kind)
        }
        Assertion::JsonIsArray => match body {
            Value::Array(items) => AssertionResult::pass_with_value(
                assertion.clone(),
                format!("{} items", items.len()),
            ),
            other => AssertionResult::fail_with_diff(
                assertion.clone(),
                "an array",
                JsonKind::of(other).to_string(),
                "Body is not an array",
            ),
        },
        Assertion::JsonIsEmptyArray => match body {
            Value::Array(items) if items.is_empty() => AssertionResult::pass(assertion.clone()),
            other => AssertionResult::fail_with_diff(
                assertion.clone(),
                "[]",
                render(other),
                "Body is not an empty array",
            ),
        },
        Assertion::JsonEachField { field, expected } => {
            check_json_each_field(assertion, body, field, expected)
        }
        Assertion::StatusCode { .. } => AssertionResult::fail(
            assertion.clone(),
            "Assertion does not inspect the JSON body".to_string(),
        ),
    }
}

/// Subset match: every expected field present and satisfied; extra fields ignored.
fn check_json_contains(
    assertion: &Assertion,
    body: &Value,
    fields: &[FieldExpectation],
) -> AssertionResult {
    let Value::Object(object) = body else {
        return AssertionResult::fail_with_diff(
            assertion.clone(),
            "an object",
            render(body),
            format!("Body is {}, expected an object", JsonKind::of(body)),
        );
    };

    let mismatches: Vec<String> = fields
        .iter()
        .filter_map(|field| match object.get(&field.name) {
            None => Some(format!("'{}' is missing", field.name)),
            Some(actual) if !field.matcher.matches(actual) => Some(format!(
                "'{}' expected {}, got {}",
                field.name, field.matcher, actual
            )),
            Some(_) => None,
        })
        .collect();

    if mismatches.is_empty() {
        return AssertionResult::pass(assertion.clone());
    }

    let expected: Map<String, Value> = fields
        .iter()
        .map(|f| (f.name.clone(), Value::String(f.matcher.to_string())))
        .collect();
    let actual: Map<String, Value> = fields
        .iter()
        .filter_map(|f| object.get(&f.name).map(|v| (f.name.clone(), v.clone())))
        .collect();

    AssertionResult::fail_with_diff(
        assertion.clone(),
        render(&Value::Object(expected)),
        render(&Value::Object(actual)),
        format!("Field mismatch: {}", mismatches.join("; ")),
    )
}

fn check_json_field_kind(
    assertion: &Assertion,
    body: &Value,
    field: &str,
    kind: JsonKind,
) -> AssertionResult {
    match body.get(field) {
        Some(value) if JsonKind::of(value) == kind => {
            AssertionResult::pass_with_value(assertion.clone(), value.to_string())
        }
        Some(value) => AssertionResult::fail_with_diff(
            assertion.clone(),
            kind.to_string(),
            JsonKind::of(value).to_string(),
            format!("Field '{field}' is {}, expected {kind}", JsonKind::of(value)),
        ),
        None => AssertionResult::fail(assertion.clone(), format!("Field '{field}' is missing")),
    }
}

/// Every element must carry `field == expected`; an empty array passes.
fn check_json_each_field(
    assertion: &Assertion,
    body: &Value,
    field: &str,
    expected: &Value,
) -> AssertionResult {
    let Value::Array(items) = body else {
        return AssertionResult::fail_with_diff(
            assertion.clone(),
            "an array",
            JsonKind::of(body).to_string(),
            "Body is not an array",
        );
    };

    let offenders: Vec<(usize, Option<&Value>)> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (i, item.get(field)))
        .filter(|(_, actual)| *actual != Some(expected))
        .collect();

    match offenders.first() {
        None => AssertionResult::pass_with_value(
            assertion.clone(),
            format!("{} items checked", items.len()),
        ),
        Some((index, actual)) => AssertionResult::fail_with_diff(
            assertion.clone(),
            render(expected),
            actual.map_or_else(|| "<missing>".to_string(), render),
            format!(
                "{} of {} elements have a different '{field}'; first at index {index}",
                offenders.len(),
                items.len()
            ),
        ),
    }
}

fn render(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use petstore_domain::testing::FieldMatcher;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;

    fn create_response(status: u16, body: &str, headers: HashMap<String, String>) -> ResponseSpec {
        ResponseSpec::new(status, headers, body.as_bytes(), Duration::from_millis(50))
    }

    fn json_response(status: u16, body: &Value) -> ResponseSpec {
        ResponseSpec::json(status, body)
    }

    #[test]
    fn test_status_code_exact() {
        let runner = TestRunner::new();
        let response = json_response(404, &json!({"message": "Pet not found"}));

        let result = runner.run_assertion(&Assertion::status(404), &response);
        assert!(result.passed);

        let result = runner.run_assertion(&Assertion::status(200), &response);
        assert!(!result.passed);
        assert_eq!(result.expected.as_deref(), Some("= 200"));
        assert_eq!(result.actual.as_deref(), Some("404 Not Found"));
    }

    #[test]
    fn test_json_contains_ignores_extra_fields() {
        let runner = TestRunner::new();
        let response = json_response(
            200,
            &json!({"id": 123, "name": "KOER", "photoUrls": [], "tags": [], "status": "available"}),
        );

        let assertion = Assertion::contains(&json!({"name": "KOER", "status": "available"}));
        assert!(runner.run_assertion(&assertion, &response).passed);
    }

    #[test]
    fn test_json_contains_reports_every_mismatch() {
        let runner = TestRunner::new();
        let response = json_response(200, &json!({"name": "Other", "status": "available"}));

        let assertion =
            Assertion::contains(&json!({"id": 1, "name": "KOER", "status": "available"}));
        let result = runner.run_assertion(&assertion, &response);

        assert!(!result.passed);
        assert_eq!(
            result.error.as_deref(),
            Some(r#"Field mismatch: 'id' is missing; 'name' expected "KOER", got "Other""#)
        );
        assert!(result.actual.is_some_and(|a| a.contains("Other")));
    }

    #[test]
    fn test_json_contains_with_kind_matchers() {
        let runner = TestRunner::new();
        let assertion = Assertion::JsonContains {
            fields: vec![
                FieldExpectation::kind("id", JsonKind::Number),
                FieldExpectation::equals("photoUrls", json!([])),
                FieldExpectation::equals("tags", json!([])),
            ],
        };

        let created = json_response(
            200,
            &json!({"id": 9_223_372_036_854_775_807_i64, "photoUrls": [], "tags": []}),
        );
        assert!(runner.run_assertion(&assertion, &created).passed);

        let string_id = json_response(200, &json!({"id": "1", "photoUrls": [], "tags": []}));
        assert!(!runner.run_assertion(&assertion, &string_id).passed);
    }

    #[test]
    fn test_json_contains_requires_object() {
        let runner = TestRunner::new();
        let assertion = Assertion::JsonContains { fields: vec![] };

        assert!(runner.run_assertion(&assertion, &json_response(200, &json!({}))).passed);
        assert!(!runner.run_assertion(&assertion, &json_response(200, &json!([]))).passed);
    }

    #[test]
    fn test_json_field_kind() {
        let runner = TestRunner::new();
        let response = json_response(200, &json!({"id": 5, "name": "KOER"}));

        let assertion = Assertion::JsonFieldKind {
            field: "id".to_string(),
            kind: JsonKind::Number,
        };
        assert!(runner.run_assertion(&assertion, &response).passed);

        let assertion = Assertion::JsonFieldKind {
            field: "name".to_string(),
            kind: JsonKind::Number,
        };
        let result = runner.run_assertion(&assertion, &response);
        assert_eq!(result.error.as_deref(), Some("Field 'name' is a string, expected a number"));
    }

    #[test]
    fn test_json_is_empty_array() {
        let runner = TestRunner::new();
        assert!(runner
            .run_assertion(&Assertion::JsonIsEmptyArray, &json_response(200, &json!([])))
            .passed);
        assert!(!runner
            .run_assertion(&Assertion::JsonIsEmptyArray, &json_response(200, &json!([{"id": 1}])))
            .passed);
        assert!(!runner
            .run_assertion(&Assertion::JsonIsEmptyArray, &json_response(200, &json!({})))
            .passed);
    }

    #[test]
    fn test_json_each_field() {
        let runner = TestRunner::new();
        let assertion = Assertion::JsonEachField {
            field: "status".to_string(),
            expected: json!("sold"),
        };

        let all_sold = json_response(200, &json!([{"status": "sold"}, {"status": "sold"}]));
        assert!(runner.run_assertion(&assertion, &all_sold).passed);

        let empty = json_response(200, &json!([]));
        assert!(runner.run_assertion(&assertion, &empty).passed);

        let mixed = json_response(200, &json!([{"status": "sold"}, {"status": "pending"}, {}]));
        let result = runner.run_assertion(&assertion, &mixed);
        assert!(!result.passed);
        assert_eq!(
            result.error.as_deref(),
            Some("2 of 3 elements have a different 'status'; first at index 1")
        );
        assert_eq!(result.actual.as_deref(), Some("\"pending\""));
    }

    #[test]
    fn test_body_assertion_on_non_json_body() {
        let runner = TestRunner::new();
        let response = create_response(405, "", HashMap::new());

        let result = runner.run_assertion(&Assertion::JsonIsArray, &response);
        assert!(!result.passed);
        assert!(result
            .error
            .is_some_and(|e| e.starts_with("Failed to parse body as JSON")));
    }

    #[test]
    fn test_run_evaluates_every_assertion() {
        let runner = TestRunner::new();
        let response = json_response(404, &json!({"message": "Pet not found"}));

        let assertions = vec![
            Assertion::status(200),
            Assertion::contains(&json!({"message": "Pet not found"})),
            Assertion::JsonIsArray,
        ];
        let results = runner.run("Delete Pet > non-existing id", &assertions, &response);

        assert_eq!(results.total, 3);
        assert_eq!(results.passed, 1);
        assert_eq!(results.failed, 2);
    }

    #[test]
    fn test_stop_on_failure() {
        let runner = TestRunner::new().with_stop_on_failure(true);
        let response = create_response(404, "Not Found", HashMap::new());

        let assertions = vec![
            Assertion::status(200),
            Assertion::JsonContains {
                fields: vec![FieldExpectation {
                    name: "message".to_string(),
                    matcher: FieldMatcher::Equals(json!("Pet not found")),
                }],
            },
        ];

        let results = runner.run("Failing", &assertions, &response);
        assert!(!results.all_passed());
        assert_eq!(results.results.len(), 1);
    }
}
