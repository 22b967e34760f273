//! Variable parser for {{variable}} syntax
//!
//! Parses strings to extract variable references with their positions.

use std::ops::Range;

/// Represents a parsed variable reference in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The variable name (without {{ }}).
    pub name: String,

    /// Byte range in the original string where this reference appears.
    pub span: Range<usize>,
}

impl VariableReference {
    /// Creates a new variable reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Parses a string and extracts all `{{name}}` references.
///
/// Whitespace inside the braces is ignored; empty references and an
/// unterminated `{{` are skipped.
///
/// # Examples
///
/// ```
/// use petstore_application::variable_resolver::parser::parse_variables;
///
/// let refs = parse_variables("/pet/{{pet_id}}?tag={{ tag }}");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "pet_id");
/// assert_eq!(refs[1].name, "tag");
/// ```
#[must_use]
pub fn parse_variables(input: &str) -> Vec<VariableReference> {
    let mut references = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if ch != '{' || !matches!(chars.peek(), Some((_, '{'))) {
            continue;
        }
        chars.next(); // consume second {

        let mut name = String::new();
        let mut found_end = false;

        while let Some((_, ch)) = chars.next() {
            if ch == '}' {
                if let Some(&(end_idx, '}')) = chars.peek() {
                    chars.next(); // consume second }
                    let trimmed = name.trim();
                    if !trimmed.is_empty() {
                        references.push(VariableReference::new(trimmed, i..end_idx + 1));
                    }
                    found_end = true;
                    break;
                }
            }
            name.push(ch);
        }

        if !found_end {
            break;
        }
    }

    references
}

/// Returns the variable name if `input` is exactly one reference and nothing else.
///
/// Used to substitute typed JSON values: `"{{pet_id}}"` becomes a number.
#[must_use]
pub fn whole_reference(input: &str) -> Option<String> {
    let trimmed = input.trim();
    match parse_variables(trimmed).as_slice() {
        [only] if only.span == (0..trimmed.len()) => Some(only.name.clone()),
        _ => None,
    }
}

/// Returns true if the input string contains any variable references.
#[must_use]
pub fn has_variables(input: &str) -> bool {
    !parse_variables(input).is_empty()
}

/// Extracts just the variable names from the input without full parsing info.
#[must_use]
pub fn extract_variable_names(input: &str) -> Vec<String> {
    parse_variables(input).into_iter().map(|r| r.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_variable() {
        let refs = parse_variables("{{pet_id}}");
        assert_eq!(refs, vec![VariableReference::new("pet_id", 0..10)]);
    }

    #[test]
    fn test_parse_with_whitespace() {
        let refs = parse_variables("{{ pet_id }}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "pet_id");
    }

    #[test]
    fn test_variable_in_path() {
        let input = "/pet/{{pet_id}}/uploadImage";
        let refs = parse_variables(input);
        assert_eq!(refs.len(), 1);
        assert_eq!(&input[refs[0].span.clone()], "{{pet_id}}");
    }

    #[test]
    fn test_unclosed_and_empty_references() {
        assert!(parse_variables("{{pet_id").is_empty());
        assert!(parse_variables("{{}}").is_empty());
        assert!(parse_variables("{{   }}").is_empty());
        assert!(parse_variables("{pet_id}").is_empty());
    }

    #[test]
    fn test_adjacent_variables() {
        assert_eq!(extract_variable_names("{{a}}{{b}}"), vec!["a", "b"]);
    }

    #[test]
    fn test_whole_reference() {
        assert_eq!(whole_reference("{{pet_id}}"), Some("pet_id".to_string()));
        assert_eq!(whole_reference(" {{ pet_id }} "), Some("pet_id".to_string()));
        assert_eq!(whole_reference("id-{{pet_id}}"), None);
        assert_eq!(whole_reference("{{a}}{{b}}"), None);
        assert_eq!(whole_reference("plain"), None);
    }

    #[test]
    fn test_has_variables() {
        assert!(has_variables("/pet/{{pet_id}}"));
        assert!(!has_variables("/pet/999999"));
        assert!(!has_variables("{{incomplete"));
    }
}
