//! Naming convention checks for type and constant names.
//!
//! Field names are checked alongside the other field rules in
//! [`FieldValidator`](super::FieldValidator).

use crate::config::NamingRules;
use crate::hir::{Diagnostic, ErrorKind, SourceFile};

pub struct NamingValidator<'a> {
    rules: &'a NamingRules,
}

impl<'a> NamingValidator<'a> {
    pub fn new(rules: &'a NamingRules) -> Self {
        Self { rules }
    }

    pub fn validate(&self, file: &SourceFile) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for ty in &file.types {
            if !self.rules.accepts_type_name(&ty.name) {
                out.push(Diagnostic::warning(
                    &ty.file,
                    ty.position,
                    ErrorKind::InvalidTypeName,
                    format!(
                        "Type name '{}' does not match pattern {}",
                        ty.name,
                        self.rules.type_name.as_str()
                    ),
                ));
            }
        }
        for constant in &file.constants {
            if !self.rules.accepts_constant_name(&constant.name) {
                out.push(Diagnostic::warning(
                    &constant.file,
                    constant.position,
                    ErrorKind::InvalidConstantName,
                    format!(
                        "Constant name '{}' does not match pattern {}",
                        constant.name,
                        self.rules.constant_name.as_str()
                    ),
                ));
            }
        }
        out
    }
}
