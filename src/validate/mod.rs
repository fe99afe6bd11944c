//! Semantic validation of extracted `.msg` models.
//!
//! The individual validators return their findings as data; the
//! [`Validator`] decides ordering and what stops a run.

pub mod attributes;
mod collections;
mod enums;
mod fields;
mod naming;
mod orchestrator;

pub use attributes::{AttributeValidator, SchemaRegistry};
pub use collections::CollectionValidator;
pub use enums::EnumValidator;
pub use fields::FieldValidator;
pub use naming::NamingValidator;
pub use orchestrator::{ParseOutcome, Phase, ValidationResult, Validator};
