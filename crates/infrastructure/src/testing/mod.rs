//! Scenario evaluation and suite execution.
//!
//! [`TestRunner`] judges a single response, [`SuiteRunner`] drives a whole
//! suite and produces a [`SuiteReport`].

mod report;
mod runner;
mod suite;

pub use report::{ScenarioOutcome, SuiteReport};
pub use runner::TestRunner;
pub use suite::{ScenarioError, SuiteError, SuiteRunner};
