//! Suite execution.
//!
//! Runs the optional setup once, then every scenario in order against the
//! resulting fixture.

use std::sync::Arc;
use std::time::Instant;

use petstore_application::{
    ExecuteRequest, ExecuteRequestError, FixtureError, HttpClient, PrepareFixture, ResolveError,
    ResolveScenario,
};
use petstore_domain::response::ResponseSpec;
use petstore_domain::{Assertion, Scenario, Suite, SuiteFixture};
use thiserror::Error;
use tracing::{error, info, warn};

use super::report::{ScenarioOutcome, SuiteReport};
use super::runner::TestRunner;

/// Why a single scenario produced no response to evaluate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScenarioError {
    /// The scenario could not be bound to the fixture.
    #[error("{0}")]
    Resolve(#[from] ResolveError),

    /// The request did not complete.
    #[error("request failed: {0}")]
    Request(#[from] ExecuteRequestError),
}

/// Errors that abort a whole suite run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SuiteError {
    /// Setup did not produce a fixture, so no scenario was run.
    #[error("suite setup failed: {0}")]
    Setup(#[from] FixtureError),
}

/// Runs suites through an [`HttpClient`].
pub struct SuiteRunner<C: HttpClient> {
    executor: ExecuteRequest<C>,
    resolver: ResolveScenario,
    runner: TestRunner,
}

impl<C: HttpClient> SuiteRunner<C> {
    /// Creates a runner sending requests through `client`.
    pub fn new(client: Arc<C>, resolver: ResolveScenario) -> Self {
        Self {
            executor: ExecuteRequest::new(client),
            resolver,
            runner: TestRunner::new(),
        }
    }

    /// Replaces the assertion runner.
    #[must_use]
    pub fn with_test_runner(mut self, runner: TestRunner) -> Self {
        self.runner = runner;
        self
    }

    /// Runs the suite's setup, or returns an empty fixture if it has none.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Setup`] if setup fails in any way.
    pub async fn prepare(&self, suite: &Suite) -> Result<SuiteFixture, SuiteError> {
        let Some(setup) = &suite.setup else {
            return Ok(SuiteFixture::empty());
        };

        PrepareFixture::new(self.executor.clone(), self.resolver.clone())
            .execute(setup)
            .await
            .map_err(|e| {
                error!(suite = %suite.name, error = %e, "setup failed, aborting run");
                SuiteError::from(e)
            })
    }

    /// Runs one scenario against `fixture`.
    ///
    /// Resolution and transport failures become a failed outcome.
    pub async fn run_scenario(
        &self,
        scenario: &Scenario,
        fixture: &SuiteFixture,
    ) -> ScenarioOutcome {
        let start = Instant::now();

        let outcome = match self.send(scenario, fixture).await {
            Ok((response, assertions)) => {
                let results = self
                    .runner
                    .run(&scenario.full_name(), &assertions, &response);
                ScenarioOutcome::evaluated(
                    &scenario.group,
                    &scenario.name,
                    response.status,
                    elapsed_ms(start),
                    results,
                )
            }
            Err(e) => ScenarioOutcome::errored(
                &scenario.group,
                &scenario.name,
                elapsed_ms(start),
                e.to_string(),
            ),
        };

        if outcome.passed() {
            info!(scenario = %outcome.full_name(), duration_ms = outcome.duration_ms, "passed");
        } else {
            warn!(
                scenario = %outcome.full_name(),
                status = ?outcome.status,
                error = outcome.error.as_deref().unwrap_or_default(),
                "failed"
            );
        }
        outcome
    }

    /// Runs setup and then every scenario sequentially.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Setup`] without running any scenario when the
    /// setup fails. Scenario failures are reported, not returned.
    pub async fn run(&self, suite: &Suite) -> Result<SuiteReport, SuiteError> {
        let start = Instant::now();
        info!(
            suite = %suite.name,
            scenarios = suite.len(),
            base_url = self.resolver.base_url(),
            "starting suite"
        );

        let fixture = self.prepare(suite).await?;

        let mut outcomes = Vec::with_capacity(suite.len());
        for scenario in &suite.scenarios {
            outcomes.push(self.run_scenario(scenario, &fixture).await);
        }

        let report = SuiteReport::new(suite.name.clone(), outcomes, elapsed_ms(start));
        info!(
            suite = %report.suite_name,
            passed = report.passed,
            failed = report.failed,
            duration_ms = report.duration_ms,
            "suite finished"
        );
        Ok(report)
    }

    async fn send(
        &self,
        scenario: &Scenario,
        fixture: &SuiteFixture,
    ) -> Result<(ResponseSpec, Vec<Assertion>), ScenarioError> {
        let resolved = self.resolver.resolve(scenario, fixture)?;
        let response = self.executor.execute(&resolved.request).await?;
        Ok((response, resolved.assertions))
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
