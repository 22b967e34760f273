//! Suite fixture: values produced once by setup and read by scenarios.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scenario::Scenario;
use crate::testing::JsonKind;

/// Variable name bound to the id of the pet created during setup.
pub const PET_ID: &str = "pet_id";

/// Immutable set of variables bound by the setup phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuiteFixture {
    variables: BTreeMap<String, Value>,
}

impl SuiteFixture {
    /// Creates an empty fixture, for suites where no scenario needs setup.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            variables: BTreeMap::new(),
        }
    }

    /// Binds a variable (builder pattern). Only the setup phase calls this.
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    /// Gets a bound variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Returns the created pet's id, if setup bound one.
    #[must_use]
    pub fn pet_id(&self) -> Option<i64> {
        self.get(PET_ID).and_then(Value::as_i64)
    }

    /// Returns the bound variable names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Moves one value from the setup response into the fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Fixture variable to bind.
    pub variable: String,
    /// JSON path into the setup response body.
    pub path: String,
    /// Kind the extracted value must have.
    pub kind: JsonKind,
}

impl Extraction {
    /// Creates an extraction.
    #[must_use]
    pub fn new(variable: impl Into<String>, path: impl Into<String>, kind: JsonKind) -> Self {
        Self {
            variable: variable.into(),
            path: path.into(),
            kind,
        }
    }
}

/// The setup request and the values it must yield.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureSetup {
    /// Request to perform; its assertions are not evaluated.
    pub scenario: Scenario,
    /// Values to extract from the response body.
    pub extractions: Vec<Extraction>,
}

impl FixtureSetup {
    /// Creates a setup step.
    #[must_use]
    pub const fn new(scenario: Scenario, extractions: Vec<Extraction>) -> Self {
        Self {
            scenario,
            extractions,
        }
    }
}
