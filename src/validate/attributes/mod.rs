//! Schema-driven attribute checks.
//!
//! Schemas are loaded into a [`SchemaRegistry`]; an [`AttributeValidator`]
//! checks the attributes of fields, structs, and enums against the schemas
//! enabled in [`AttributeConfig`](crate::config::AttributeConfig).

mod registry;
mod schema;
mod validator;

pub use registry::SchemaRegistry;
pub use schema::{
    AttributeSchema, AttributeScope, AttributeSpec, Bound, Constraints, Pattern, SchemaError,
    TypeSpec, ValueType,
};
pub use validator::AttributeValidator;
