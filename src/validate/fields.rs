//! Field numbering and field name checks for structs and interfaces.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::config::{NamingRules, ValidationConfig};
use crate::hir::{Diagnostic, ErrorKind, Field, TypeDefinition};

pub struct FieldValidator<'a> {
    config: &'a ValidationConfig,
    naming: Option<&'a NamingRules>,
}

impl<'a> FieldValidator<'a> {
    pub fn new(config: &'a ValidationConfig, naming: Option<&'a NamingRules>) -> Self {
        Self { config, naming }
    }

    /// All findings for the fields of `ty`.
    pub fn validate(&self, ty: &TypeDefinition) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        self.check_numbers(ty, &mut out);
        self.check_names(ty, &mut out);
        out
    }

    fn check_numbers(&self, ty: &TypeDefinition, out: &mut Vec<Diagnostic>) {
        let fields = ty.fields();
        if fields.is_empty() {
            return;
        }

        let numbered: Vec<(&Field, i64)> = fields
            .iter()
            .filter_map(|f| f.number.map(|n| (f, n)))
            .collect();

        if numbered.is_empty() {
            if self.config.enforce_field_numbering {
                out.push(Diagnostic::error(
                    &ty.file,
                    ty.position,
                    ErrorKind::FieldNumberingRequired,
                    format!("Fields of '{}' must be numbered", ty.name),
                ));
            }
            return;
        }

        // All or nothing: once one field is numbered every field must be.
        if let Some(unnumbered) = fields.iter().find(|f| f.number.is_none()) {
            out.push(Diagnostic::error(
                &ty.file,
                unnumbered.position,
                ErrorKind::FieldNumberingInconsistent,
                format!(
                    "Field '{}' in '{}' has no field number, but other fields are numbered",
                    unnumbered.name, ty.name
                ),
            ));
            return;
        }

        let mut by_number: IndexMap<i64, Vec<&Field>> = IndexMap::new();
        for (field, number) in &numbered {
            by_number.entry(*number).or_default().push(field);
        }
        for (number, users) in &by_number {
            if users.len() > 1 {
                let names: Vec<String> = users.iter().map(|f| format!("'{}'", f.name)).collect();
                out.push(Diagnostic::error(
                    &ty.file,
                    users[0].position,
                    ErrorKind::DuplicateFieldNumber,
                    format!(
                        "Duplicate field number {number} in '{}': fields {} share it",
                        ty.name,
                        names.join(", ")
                    ),
                ));
            }
        }

        for (field, number) in &numbered {
            if *number < 0 && !self.config.allow_negative_field_numbers {
                out.push(Diagnostic::error(
                    &ty.file,
                    field.position,
                    ErrorKind::NegativeFieldNumber,
                    format!("Field '{}' has negative field number {number}", field.name),
                ));
            }
            if *number > self.config.max_field_number {
                out.push(Diagnostic::error(
                    &ty.file,
                    field.position,
                    ErrorKind::FieldNumberTooLarge,
                    format!(
                        "Field '{}' has field number {number}, above the maximum {}",
                        field.name, self.config.max_field_number
                    ),
                ));
            }
        }

        if self.config.warn_on_number_gaps {
            // Widened so a gap between the i64 extremes cannot overflow.
            let distinct: Vec<i128> = numbered
                .iter()
                .map(|(_, n)| i128::from(*n))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            let anchor = numbered[0].0.position;
            for pair in distinct.windows(2) {
                let (current, next) = (pair[0], pair[1]);
                if next - current <= 1 {
                    continue;
                }
                let missing = if next - current == 2 {
                    (current + 1).to_string()
                } else {
                    format!("{}-{}", current + 1, next - 1)
                };
                out.push(Diagnostic::warning(
                    &ty.file,
                    anchor,
                    ErrorKind::FieldNumberGap,
                    format!(
                        "Field numbers in '{}' jump from {current} to {next} (missing {missing})",
                        ty.name
                    ),
                ));
            }
        }
    }

    fn check_names(&self, ty: &TypeDefinition, out: &mut Vec<Diagnostic>) {
        let mut seen = BTreeSet::new();
        for field in ty.fields() {
            if !seen.insert(&*field.name) {
                out.push(Diagnostic::error(
                    &ty.file,
                    field.position,
                    ErrorKind::DuplicateFieldName,
                    format!("Duplicate field name '{}' in '{}'", field.name, ty.name),
                ));
            }
        }

        let Some(naming) = self.naming else {
            return;
        };
        for field in ty.fields() {
            if !naming.accepts_field_name(&field.name) {
                out.push(Diagnostic::warning(
                    &ty.file,
                    field.position,
                    ErrorKind::InvalidFieldName,
                    format!(
                        "Field name '{}' does not match pattern {}",
                        field.name,
                        naming.field_name.as_str()
                    ),
                ));
            }
        }
    }
}
