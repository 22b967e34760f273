//! Application use cases (business logic orchestration).

mod prepare_fixture;
mod resolve_scenario;

pub use prepare_fixture::*;
pub use resolve_scenario::*;
