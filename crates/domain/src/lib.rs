//! Petstore Domain - Core harness types
//!
//! This crate defines the scenario, request, response and assertion model
//! for the Petstore E2E harness. All types here are pure Rust with no I/O.

pub mod error;
pub mod fixture;
pub mod json_path;
pub mod pet;
pub mod request;
pub mod response;
pub mod scenario;
pub mod suite;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use fixture::{Extraction, FixtureSetup, PET_ID, SuiteFixture};
pub use json_path::JsonPathError;
pub use pet::{ApiMessage, NamedRef, Pet, PetStatus};
pub use scenario::Scenario;
pub use suite::Suite;
pub use testing::{
    Assertion, AssertionResult, FieldExpectation, FieldMatcher, JsonKind, TestResults,
};
