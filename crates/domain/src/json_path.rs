//! Minimal JSONPath-like lookups used by assertions and fixture extraction.
//!
//! Supports `$`, `$.field`, `$.field.nested`, `$.array[0]` and `$.array[*]`.

use serde_json::Value;

/// Errors produced by a malformed path expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JsonPathError {
    /// The expression does not start with `$`.
    #[error("JSON path must start with '$'")]
    MissingRoot,

    /// An array index is neither a number nor `*`.
    #[error("invalid array index: {0}")]
    InvalidIndex(String),
}

/// Looks up `path` in `json`.
///
/// Returns `Ok(None)` when the path is well formed but points at nothing.
///
/// # Errors
///
/// Returns an error if the path expression is malformed.
pub fn query<'a>(json: &'a Value, path: &str) -> Result<Option<&'a Value>, JsonPathError> {
    let path = path.trim();
    let Some(rest) = path.strip_prefix('$') else {
        return Err(JsonPathError::MissingRoot);
    };
    if rest.is_empty() {
        return Ok(Some(json));
    }

    let rest = rest.strip_prefix('.').unwrap_or(rest);
    let mut current = json;

    for segment in split_segments(rest) {
        if let Some((name, index)) = parse_array_access(&segment) {
            if !name.is_empty() {
                match current.get(name) {
                    Some(v) => current = v,
                    None => return Ok(None),
                }
            }
            if index == "*" {
                return Ok(Some(current));
            }
            let idx: usize = index
                .parse()
                .map_err(|_| JsonPathError::InvalidIndex(index.to_string()))?;
            match current.get(idx) {
                Some(v) => current = v,
                None => return Ok(None),
            }
        } else {
            match current.get(segment.as_str()) {
                Some(v) => current = v,
                None => return Ok(None),
            }
        }
    }

    Ok(Some(current))
}

/// Splits a path into segments, keeping bracketed indices with their field.
fn split_segments(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_bracket = false;

    for ch in path.chars() {
        match ch {
            '.' if !in_bracket => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            '[' => {
                in_bracket = true;
                current.push(ch);
            }
            ']' => {
                in_bracket = false;
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Parses `field[0]` into `("field", "0")`.
fn parse_array_access(segment: &str) -> Option<(&str, &str)> {
    let bracket_start = segment.find('[')?;
    if !segment.ends_with(']') {
        return None;
    }
    Some((
        &segment[..bracket_start],
        &segment[bracket_start + 1..segment.len() - 1],
    ))
}
