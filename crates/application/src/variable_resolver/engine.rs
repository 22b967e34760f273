//! Variable resolution engine
//!
//! Substitutes `{{variable}}` references with values bound in a
//! [`SuiteFixture`].

use petstore_domain::SuiteFixture;
use serde_json::Value;

use super::parser::{parse_variables, whole_reference};

/// Result of variable resolution for a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    /// The resolved string; unresolved references are left as written.
    pub resolved: String,

    /// Variable names that could not be resolved.
    pub unresolved: Vec<String>,
}

impl ResolutionResult {
    /// Whether all variables were successfully resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Result of variable resolution for a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonResolution {
    /// The resolved document.
    pub value: Value,

    /// Variable names that could not be resolved.
    pub unresolved: Vec<String>,
}

/// Resolves `{{variable}}` references against a fixture.
#[derive(Debug, Clone, Copy)]
pub struct VariableResolver<'a> {
    fixture: &'a SuiteFixture,
}

impl<'a> VariableResolver<'a> {
    /// Creates a resolver reading from `fixture`.
    #[must_use]
    pub const fn new(fixture: &'a SuiteFixture) -> Self {
        Self { fixture }
    }

    /// Resolves all variables in the input string.
    ///
    /// Bound strings are inserted without quotes; other JSON values use
    /// their compact JSON text (so a numeric id becomes `123`).
    #[must_use]
    pub fn resolve(&self, input: &str) -> ResolutionResult {
        let references = parse_variables(input);
        if references.is_empty() {
            return ResolutionResult {
                resolved: input.to_string(),
                unresolved: Vec::new(),
            };
        }

        let mut unresolved = Vec::new();
        let mut result = String::with_capacity(input.len());
        let mut last_end = 0;

        for var_ref in &references {
            result.push_str(&input[last_end..var_ref.span.start]);

            match self.fixture.get(&var_ref.name) {
                Some(value) => result.push_str(&value_as_text(value)),
                None => {
                    result.push_str(&input[var_ref.span.clone()]);
                    unresolved.push(var_ref.name.clone());
                }
            }

            last_end = var_ref.span.end;
        }

        result.push_str(&input[last_end..]);

        ResolutionResult {
            resolved: result,
            unresolved,
        }
    }

    /// Resolves variables in every string leaf and object key of `value`.
    ///
    /// A leaf that is exactly one reference is replaced by the bound value
    /// itself, keeping its JSON type.
    #[must_use]
    pub fn resolve_json(&self, value: &Value) -> JsonResolution {
        let mut unresolved = Vec::new();
        let value = self.resolve_value(value, &mut unresolved);
        JsonResolution { value, unresolved }
    }

    fn resolve_value(&self, value: &Value, unresolved: &mut Vec<String>) -> Value {
        match value {
            Value::String(s) => {
                if let Some(name) = whole_reference(s) {
                    if let Some(bound) = self.fixture.get(&name) {
                        return bound.clone();
                    }
                }
                let result = self.resolve(s);
                unresolved.extend(result.unresolved);
                Value::String(result.resolved)
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.resolve_value(item, unresolved))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, item)| {
                        let key = self.resolve(key);
                        unresolved.extend(key.unresolved);
                        (key.resolved, self.resolve_value(item, unresolved))
                    })
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petstore_domain::PET_ID;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixture() -> SuiteFixture {
        SuiteFixture::empty()
            .with_variable(PET_ID, json!(9_876_543_210_i64))
            .with_variable("name", json!("KOER"))
    }

    #[test]
    fn test_resolve_no_variables() {
        let fixture = fixture();
        let result = VariableResolver::new(&fixture).resolve("/pet/999999");
        assert_eq!(result.resolved, "/pet/999999");
        assert!(result.is_complete());
    }

    #[test]
    fn test_resolve_path() {
        let fixture = fixture();
        let result = VariableResolver::new(&fixture).resolve("/pet/{{pet_id}}");
        assert_eq!(result.resolved, "/pet/9876543210");
        assert!(result.is_complete());
    }

    #[test]
    fn test_string_values_are_unquoted() {
        let fixture = fixture();
        let result = VariableResolver::new(&fixture).resolve("name={{name}}");
        assert_eq!(result.resolved, "name=KOER");
    }

    #[test]
    fn test_unresolved_variable_is_kept_and_reported() {
        let fixture = SuiteFixture::empty();
        let result = VariableResolver::new(&fixture).resolve("/pet/{{pet_id}}/{{other}}");
        assert_eq!(result.resolved, "/pet/{{pet_id}}/{{other}}");
        assert_eq!(result.unresolved, vec!["pet_id", "other"]);
        assert!(!result.is_complete());
    }

    #[test]
    fn test_resolve_json_keeps_type_of_whole_reference() {
        let fixture = fixture();
        let resolved = VariableResolver::new(&fixture).resolve_json(&json!({
            "id": "{{pet_id}}",
            "name": "UpdatedName",
            "tags": [{"name": "tag-{{name}}"}]
        }));

        assert_eq!(
            resolved.value,
            json!({
                "id": 9_876_543_210_i64,
                "name": "UpdatedName",
                "tags": [{"name": "tag-KOER"}]
            })
        );
        assert!(resolved.unresolved.is_empty());
    }

    #[test]
    fn test_resolve_json_reports_unresolved() {
        let fixture = SuiteFixture::empty();
        let resolved = VariableResolver::new(&fixture).resolve_json(&json!({"id": "{{pet_id}}"}));
        assert_eq!(resolved.value, json!({"id": "{{pet_id}}"}));
        assert_eq!(resolved.unresolved, vec!["pet_id"]);
    }
}
