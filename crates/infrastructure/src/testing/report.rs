//! Suite reports.
//!
//! A [`SuiteReport`] collects one [`ScenarioOutcome`] per scenario and
//! renders either a grouped text summary or JSON.

use std::fmt::Write as _;

use petstore_domain::testing::TestResults;
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

/// Result of running one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Endpoint group, e.g. "Find Pet by ID".
    pub group: String,
    /// Scenario name within the group.
    pub name: String,
    /// Wall time of the request in milliseconds.
    pub duration_ms: u64,
    /// Status received, if a response arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Assertion results, if a response arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<TestResults>,
    /// Why no response could be evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScenarioOutcome {
    /// Outcome for a scenario whose response was evaluated.
    #[must_use]
    pub fn evaluated(
        group: impl Into<String>,
        name: impl Into<String>,
        status: u16,
        duration_ms: u64,
        results: TestResults,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            duration_ms,
            status: Some(status),
            results: Some(results),
            error: None,
        }
    }

    /// Outcome for a scenario that never produced a response.
    #[must_use]
    pub fn errored(
        group: impl Into<String>,
        name: impl Into<String>,
        duration_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            duration_ms,
            status: None,
            results: None,
            error: Some(error.into()),
        }
    }

    /// `group > name`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} > {}", self.group, self.name)
    }

    /// True when a response arrived and every assertion held.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.results.as_ref().is_some_and(TestResults::all_passed)
    }
}

/// Aggregated outcome of a suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite name.
    pub suite_name: String,
    /// Outcomes in execution order.
    pub outcomes: Vec<ScenarioOutcome>,
    /// Number of scenarios.
    pub total: usize,
    /// Scenarios that passed.
    pub passed: usize,
    /// Scenarios that failed or errored.
    pub failed: usize,
    /// Total wall time in milliseconds.
    pub duration_ms: u64,
}

impl SuiteReport {
    /// Builds a report and its counters.
    #[must_use]
    pub fn new(
        suite_name: impl Into<String>,
        outcomes: Vec<ScenarioOutcome>,
        duration_ms: u64,
    ) -> Self {
        let total = outcomes.len();
        let passed = outcomes.iter().filter(|o| o.passed()).count();
        Self {
            suite_name: suite_name.into(),
            outcomes,
            total,
            passed,
            failed: total - passed,
            duration_ms,
        }
    }

    /// True when no scenario failed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Outcomes that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    /// Renders a human-readable summary grouped by endpoint.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.suite_name);

        let mut current_group: Option<&str> = None;
        for outcome in &self.outcomes {
            if current_group != Some(outcome.group.as_str()) {
                let _ = writeln!(out, "\n  {}", outcome.group);
                current_group = Some(outcome.group.as_str());
            }
            render_outcome(&mut out, outcome);
        }

        let _ = writeln!(
            out,
            "\n{} scenarios: {} passed, {} failed ({} ms)",
            self.total, self.passed, self.failed, self.duration_ms
        );
        out
    }

    /// Renders the report as pretty JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"  ");
        let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;

        let mut json = String::from_utf8_lossy(&buffer).into_owned();
        json.push('\n');
        Ok(json)
    }
}

fn render_outcome(out: &mut String, outcome: &ScenarioOutcome) {
    let verdict = if outcome.passed() { "ok" } else { "FAILED" };
    let status = outcome
        .status
        .map_or_else(|| "---".to_string(), |s| s.to_string());
    let _ = writeln!(
        out,
        "    [{verdict}] {} ({status}, {} ms)",
        outcome.name, outcome.duration_ms
    );

    if let Some(error) = &outcome.error {
        let _ = writeln!(out, "        error: {error}");
    }

    let Some(results) = &outcome.results else {
        return;
    };
    for failure in results.failures() {
        let _ = writeln!(out, "        - {}", failure.assertion.description());
        if let Some(error) = &failure.error {
            let _ = writeln!(out, "          {error}");
        }
        if let Some(expected) = &failure.expected {
            write_indented(out, "expected: ", expected);
        }
        if let Some(actual) = &failure.actual {
            write_indented(out, "actual:   ", actual);
        }
    }
}

fn write_indented(out: &mut String, label: &str, text: &str) {
    let pad = " ".repeat(label.len());
    for (i, line) in text.lines().enumerate() {
        let prefix = if i == 0 { label } else { pad.as_str() };
        let _ = writeln!(out, "          {prefix}{line}");
    }
}
