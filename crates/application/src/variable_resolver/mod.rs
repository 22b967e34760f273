//! Variable resolution module
//!
//! Provides parsing and resolution of `{{variable}}` syntax in strings and
//! JSON documents.
//!
//! # Usage
//!
//! ```
//! use petstore_application::variable_resolver::VariableResolver;
//! use petstore_domain::{PET_ID, SuiteFixture};
//! use serde_json::json;
//!
//! let fixture = SuiteFixture::empty().with_variable(PET_ID, json!(42));
//! let resolver = VariableResolver::new(&fixture);
//!
//! let result = resolver.resolve("/pet/{{pet_id}}");
//! assert_eq!(result.resolved, "/pet/42");
//! ```

pub mod engine;
pub mod parser;

pub use engine::{JsonResolution, ResolutionResult, VariableResolver};
pub use parser::{
    VariableReference, extract_variable_names, has_variables, parse_variables, whole_reference,
};
