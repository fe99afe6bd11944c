//! Validation tests
//!
//! End-to-end runs of the validation pipeline:
//! - Field numbering, enum, collection and naming rules
//! - Import and type resolution across files
//! - Schema-driven attribute checks

pub mod tests_attributes;
pub mod tests_pipeline;
pub mod tests_rules;
