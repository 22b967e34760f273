//! Petstore E2E Infrastructure - Adapters and implementations
//!
//! This crate provides the reqwest-backed HTTP port, configuration loading,
//! and the runner that executes suites and reports on them.

pub mod adapters;
pub mod config;
pub mod testing;

pub use adapters::ReqwestHttpClient;
pub use config::{ConfigError, ConfigLoader, HarnessConfig, ReportFormat};
pub use testing::{
    ScenarioError, ScenarioOutcome, SuiteError, SuiteReport, SuiteRunner, TestRunner,
};
