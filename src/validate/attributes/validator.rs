//! Checks attribute values on fields and types against enabled schemas.
//!
//! Each attribute is tried against every enabled schema in order. The first
//! schema that declares the name and accepts the value wins; failures under
//! schemas tried before it are dropped.

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use super::registry::SchemaRegistry;
use super::schema::{AttributeSchema, AttributeScope};
use crate::base::Position;
use crate::config::AttributeConfig;
use crate::hir::{
    AttributeMap, AttributeValue, Diagnostic, ErrorKind, Field, TypeDefinition, TypeKind,
};

pub struct AttributeValidator {
    schemas: Vec<Arc<AttributeSchema>>,
    /// Every enabled name, including ones missing from the registry.
    enabled_names: Vec<String>,
    warn_unknown: bool,
    strict: bool,
}

impl AttributeValidator {
    pub fn new(config: &AttributeConfig, registry: &SchemaRegistry) -> Self {
        let mut schemas = Vec::new();
        for name in &config.enabled_schemas {
            match registry.get(name) {
                Some(schema) => schemas.push(Arc::clone(schema)),
                None => warn!(schema = %name, "enabled attribute schema is not registered"),
            }
        }
        Self {
            schemas,
            enabled_names: config.enabled_schemas.clone(),
            warn_unknown: config.warn_unknown_attributes,
            strict: config.strict_mode,
        }
    }

    /// Whether any enabled schema is actually available.
    pub fn is_active(&self) -> bool {
        !self.schemas.is_empty()
    }

    /// Inline and indented attributes of one field.
    pub fn validate_field(&self, ty: &TypeDefinition, field: &Field) -> Vec<Diagnostic> {
        self.check_all(
            &ty.file,
            field.position,
            AttributeScope::Field,
            &field.all_attributes(),
        )
    }

    /// The `[attributes]` block of a type.
    pub fn validate_type(&self, ty: &TypeDefinition) -> Vec<Diagnostic> {
        let scope = match ty.kind() {
            TypeKind::Struct | TypeKind::Interface => AttributeScope::Struct,
            TypeKind::Enum => AttributeScope::Enum,
        };
        self.check_all(&ty.file, ty.position, scope, &ty.attributes)
    }

    fn check_all(
        &self,
        file: &Path,
        position: Position,
        scope: AttributeScope,
        attributes: &AttributeMap,
    ) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for (name, value) in attributes {
            self.check(file, position, scope, name, value, &mut diagnostics);
        }
        diagnostics
    }

    fn check(
        &self,
        file: &Path,
        position: Position,
        scope: AttributeScope,
        name: &str,
        value: &AttributeValue,
        out: &mut Vec<Diagnostic>,
    ) {
        let mut recognized = false;
        let mut failures = Vec::new();
        for schema in &self.schemas {
            let Some(spec) = schema.spec(scope, name) else {
                continue;
            };
            recognized = true;
            match spec.validate(value) {
                Ok(()) => return,
                Err(reason) => failures.push((schema.schema_name.as_str(), reason)),
            }
        }

        if !recognized {
            let message = format!(
                "Unknown attribute '{name}' (not in enabled schemas: {})",
                self.enabled_names.join(", ")
            );
            if self.strict {
                out.push(Diagnostic::error(file, position, ErrorKind::UnknownAttribute, message));
            } else if self.warn_unknown {
                out.push(Diagnostic::warning(file, position, ErrorKind::UnknownAttribute, message));
            }
            return;
        }

        for (schema, reason) in failures {
            out.push(Diagnostic::error(
                file,
                position,
                ErrorKind::InvalidAttribute,
                format!("Invalid attribute '{name}' (schema '{schema}'): {reason}"),
            ));
        }
    }
}
