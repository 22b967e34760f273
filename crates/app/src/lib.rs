//! End-to-end harness for the Swagger Petstore REST API.
//!
//! [`catalog`] holds the scenarios; [`suite_runner`] wires them to a
//! reqwest-backed client configured from a [`HarnessConfig`].

pub mod catalog;

use std::sync::Arc;

use petstore_application::{HttpClientError, ResolveScenario};
use petstore_infrastructure::{HarnessConfig, ReqwestHttpClient, SuiteRunner, TestRunner};

pub use catalog::petstore_suite;

/// Builds a suite runner talking to `config.base_url`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created.
pub fn suite_runner(
    config: &HarnessConfig,
) -> Result<SuiteRunner<ReqwestHttpClient>, HttpClientError> {
    let client = ReqwestHttpClient::new(&config.user_agent, config.timeout_ms)?;
    let resolver =
        ResolveScenario::new(config.base_url.clone()).with_timeout_ms(config.timeout_ms);
    Ok(SuiteRunner::new(Arc::new(client), resolver).with_test_runner(test_runner(config)))
}

/// Assertion runner honouring `config.stop_on_failure`.
#[must_use]
pub const fn test_runner(config: &HarnessConfig) -> TestRunner {
    TestRunner::new().with_stop_on_failure(config.stop_on_failure)
}
