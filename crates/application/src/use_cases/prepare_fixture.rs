//! Prepare fixture use case.
//!
//! Runs the suite setup request once and binds the extracted values into a
//! [`SuiteFixture`]. Any deviation aborts with a [`FixtureError`], so a broken
//! setup is reported as such instead of as unrelated assertion failures.

use petstore_domain::{FixtureSetup, JsonKind, SuiteFixture, json_path};
use thiserror::Error;
use tracing::{debug, info};

use super::resolve_scenario::{ResolveError, ResolveScenario};
use crate::execute_request::{ExecuteRequest, ExecuteRequestError};
use crate::ports::HttpClient;

/// Reasons the setup phase could not produce a fixture.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FixtureError {
    /// The setup scenario could not be resolved.
    #[error("setup request could not be built: {0}")]
    Resolve(#[from] ResolveError),

    /// The setup request did not complete.
    #[error("setup request failed: {0}")]
    Request(#[from] ExecuteRequestError),

    /// The service answered with a non-success status.
    #[error("setup returned status {status}: {body}")]
    UnexpectedStatus {
        /// Status received.
        status: u16,
        /// Body preview.
        body: String,
    },

    /// The setup response body is not JSON.
    #[error("setup response is not JSON: {0}")]
    InvalidBody(String),

    /// An extracted field is absent.
    #[error("setup response has no value at '{path}' for '{variable}'")]
    MissingValue {
        /// Fixture variable.
        variable: String,
        /// JSON path that matched nothing.
        path: String,
    },

    /// An extracted field has the wrong kind.
    #[error("setup value '{variable}' at '{path}' is {actual}, expected {expected}")]
    WrongKind {
        /// Fixture variable.
        variable: String,
        /// JSON path.
        path: String,
        /// Required kind.
        expected: JsonKind,
        /// Kind found.
        actual: JsonKind,
    },
}

/// Use case that performs the setup request and builds the fixture.
pub struct PrepareFixture<C: HttpClient> {
    executor: ExecuteRequest<C>,
    resolver: ResolveScenario,
}

impl<C: HttpClient> PrepareFixture<C> {
    /// Creates the use case.
    pub const fn new(executor: ExecuteRequest<C>, resolver: ResolveScenario) -> Self {
        Self { executor, resolver }
    }

    /// Runs setup and returns the bound fixture.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the request fails, the status is not
    /// 2xx, the body is not JSON, or an extraction is missing or mistyped.
    pub async fn execute(&self, setup: &FixtureSetup) -> Result<SuiteFixture, FixtureError> {
        let resolved = self.resolver.resolve(&setup.scenario, &SuiteFixture::empty())?;
        let response = self.executor.execute(&resolved.request).await?;

        if !response.is_success() {
            return Err(FixtureError::UnexpectedStatus {
                status: response.status,
                body: response.body_preview(200),
            });
        }

        let body = response
            .body_as_json()
            .map_err(|e| FixtureError::InvalidBody(e.to_string()))?;

        let mut fixture = SuiteFixture::empty();
        for extraction in &setup.extractions {
            let value = json_path::query(&body, &extraction.path)
                .map_err(|e| FixtureError::InvalidBody(e.to_string()))?
                .ok_or_else(|| FixtureError::MissingValue {
                    variable: extraction.variable.clone(),
                    path: extraction.path.clone(),
                })?;

            let actual = JsonKind::of(value);
            if actual != extraction.kind {
                return Err(FixtureError::WrongKind {
                    variable: extraction.variable.clone(),
                    path: extraction.path.clone(),
                    expected: extraction.kind,
                    actual,
                });
            }

            debug!(variable = %extraction.variable, %value, "bound fixture variable");
            fixture = fixture.with_variable(extraction.variable.clone(), value.clone());
        }

        info!(scenario = %setup.scenario.full_name(), "fixture prepared");
        Ok(fixture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{HttpClientError, HttpFuture};
    use petstore_domain::request::{HttpMethod, RequestSpec};
    use petstore_domain::response::ResponseSpec;
    use petstore_domain::{Extraction, PET_ID, Scenario};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    struct FakeHttpClient {
        response: Result<ResponseSpec, HttpClientError>,
    }

    impl HttpClient for FakeHttpClient {
        fn execute(&self, _request: &RequestSpec) -> HttpFuture<'_> {
            let result = self.response.clone();
            Box::pin(async move { result })
        }
    }

    fn prepare(response: Result<ResponseSpec, HttpClientError>) -> PrepareFixture<FakeHttpClient> {
        PrepareFixture::new(
            ExecuteRequest::new(Arc::new(FakeHttpClient { response })),
            ResolveScenario::new("https://petstore.swagger.io/v2"),
        )
    }

    fn setup() -> FixtureSetup {
        FixtureSetup::new(
            Scenario::new("Setup", "create pet", HttpMethod::Post, "/pet")
                .with_json(json!({"name": "KOER", "status": "available"})),
            vec![Extraction::new(PET_ID, "$.id", JsonKind::Number)],
        )
    }

    #[tokio::test]
    async fn test_binds_numeric_id() {
        let response = ResponseSpec::json(
            200,
            &json!({
                "id": 9_223_372_036_854_774_000_i64,
                "name": "KOER",
                "photoUrls": [],
                "tags": [],
                "status": "available"
            }),
        );
        let fixture = prepare(Ok(response)).execute(&setup()).await;

        assert_eq!(
            fixture.map(|f| f.pet_id()),
            Ok(Some(9_223_372_036_854_774_000))
        );
    }

    #[tokio::test]
    async fn test_missing_id_aborts() {
        let response = ResponseSpec::json(200, &json!({"name": "KOER"}));
        let result = prepare(Ok(response)).execute(&setup()).await;

        assert_eq!(
            result,
            Err(FixtureError::MissingValue {
                variable: PET_ID.to_string(),
                path: "$.id".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_non_numeric_id_aborts() {
        let response = ResponseSpec::json(200, &json!({"id": "abc"}));
        let result = prepare(Ok(response)).execute(&setup()).await;

        assert!(matches!(
            result,
            Err(FixtureError::WrongKind {
                expected: JsonKind::Number,
                actual: JsonKind::String,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_error_status_aborts() {
        let response = ResponseSpec::json(500, &json!({"message": "boom"}));
        let result = prepare(Ok(response)).execute(&setup()).await;

        assert!(matches!(
            result,
            Err(FixtureError::UnexpectedStatus { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_aborts() {
        let result = prepare(Err(HttpClientError::ConnectionFailed("reset".to_string())))
            .execute(&setup())
            .await;

        assert!(matches!(result, Err(FixtureError::Request(_))));
    }
}
