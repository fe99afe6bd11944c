//! Shared helpers for the integration tests.

pub mod source_fixtures;
pub mod validation_helpers;
