//! A suite: optional setup followed by independent scenarios.

use serde::{Deserialize, Serialize};

use crate::fixture::FixtureSetup;
use crate::scenario::Scenario;

/// Everything one run executes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suite {
    /// Suite name, shown at the top of reports.
    pub name: String,
    /// Setup that produces the fixture; `None` runs with an empty fixture.
    #[serde(default)]
    pub setup: Option<FixtureSetup>,
    /// Scenarios in catalog order.
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl Suite {
    /// Creates an empty suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            setup: None,
            scenarios: Vec::new(),
        }
    }

    /// Sets the setup step (builder pattern).
    #[must_use]
    pub fn with_setup(mut self, setup: FixtureSetup) -> Self {
        self.setup = Some(setup);
        self
    }

    /// Adds scenarios (builder pattern).
    #[must_use]
    pub fn with_scenarios(mut self, scenarios: impl IntoIterator<Item = Scenario>) -> Self {
        self.scenarios.extend(scenarios);
        self
    }

    /// Returns the distinct group names in first-seen order.
    #[must_use]
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for scenario in &self.scenarios {
            if !groups.contains(&scenario.group.as_str()) {
                groups.push(&scenario.group);
            }
        }
        groups
    }

    /// Returns the number of scenarios.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Returns true if the suite has no scenarios.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpMethod;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_groups_in_first_seen_order() {
        let suite = Suite::new("Petstore API").with_scenarios([
            Scenario::new("Create Pet", "a", HttpMethod::Post, "/pet"),
            Scenario::new("Delete Pet", "b", HttpMethod::Delete, "/pet/1"),
            Scenario::new("Create Pet", "c", HttpMethod::Post, "/pet"),
        ]);

        assert_eq!(suite.groups(), vec!["Create Pet", "Delete Pet"]);
        assert_eq!(suite.len(), 3);
        assert!(suite.setup.is_none());
    }
}
