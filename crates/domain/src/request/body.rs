//! HTTP Request body types

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Body sent with a scenario request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum RequestBody {
    /// No body
    #[default]
    None,
    /// A JSON document, sent as `application/json`
    Json(serde_json::Value),
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub const fn none() -> Self {
        Self::None
    }

    /// Creates a JSON body.
    #[must_use]
    pub const fn json(value: serde_json::Value) -> Self {
        Self::Json(value)
    }

    /// Returns whether there is no body to send.
    ///
    /// An empty JSON object (`{}`) is still a body.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the content type if applicable.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Json(_) => Some("application/json"),
        }
    }

    /// Serializes the body to the bytes sent on the wire.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON value cannot be serialized.
    pub fn to_bytes(&self) -> DomainResult<Vec<u8>> {
        match self {
            Self::None => Ok(Vec::new()),
            Self::Json(value) => {
                serde_json::to_vec(value).map_err(|e| DomainError::InvalidBody(e.to_string()))
            }
        }
    }
}
