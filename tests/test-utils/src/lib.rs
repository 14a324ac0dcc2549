//! Shared fixtures and builders for the action-logging platform's
//! integration tests
//!
//! Used by `services/logging`'s and `services/monitoring`'s `tests/`
//! directories to avoid re-deriving the same `ActionDocument` builders and
//! mock collaborators in every integration test file.

pub mod assertions;
pub mod factories;
pub mod fixtures;
pub mod helpers;
pub mod mocks;

pub use assertions::*;
pub use factories::*;
pub use fixtures::*;
pub use helpers::*;
pub use mocks::*;
