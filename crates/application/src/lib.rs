//! Petstore Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - Use case orchestration (request execution, fixture setup, scenario resolution)
//! - `{{variable}}` resolution against the suite fixture

pub mod execute_request;
pub mod ports;
pub mod use_cases;
pub mod variable_resolver;

pub use execute_request::{ExecuteRequest, ExecuteRequestError, ExecuteResult};
pub use ports::{HttpClient, HttpClientError, HttpFuture};
pub use use_cases::{FixtureError, PrepareFixture, ResolveError, ResolveScenario, ResolvedScenario};
