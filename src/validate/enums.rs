//! Enum storage type, member, and value range checks.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::base::PrimitiveType;
use crate::hir::{Diagnostic, EnumMember, ErrorKind, TypeDefinition};

#[derive(Debug, Clone, Copy, Default)]
pub struct EnumValidator;

impl EnumValidator {
    pub fn new() -> Self {
        Self
    }

    /// All findings for `ty`. Non-enum types produce none.
    pub fn validate(&self, ty: &TypeDefinition) -> Vec<Diagnostic> {
        let Some(body) = ty.enum_body() else {
            return Vec::new();
        };
        let mut out = Vec::new();

        let range = PrimitiveType::from_name(&body.storage_type).and_then(|p| p.integer_range());
        if range.is_none() {
            out.push(Diagnostic::error(
                &ty.file,
                ty.position,
                ErrorKind::InvalidEnumStorageType,
                format!(
                    "Enum '{}' has invalid storage type '{}'; expected one of int8, int16, int32, int64, uint8, uint16, uint32, uint64",
                    ty.name, body.storage_type
                ),
            ));
        }

        if body.members.is_empty() {
            out.push(Diagnostic::error(
                &ty.file,
                ty.position,
                ErrorKind::EmptyEnum,
                format!("Enum '{}' has no members", ty.name),
            ));
            return out;
        }

        let mut names = FxHashSet::default();
        for member in &body.members {
            if !names.insert(&*member.name) {
                out.push(Diagnostic::error(
                    &ty.file,
                    member.position,
                    ErrorKind::DuplicateEnumMemberName,
                    format!("Duplicate member name '{}' in enum '{}'", member.name, ty.name),
                ));
            }
        }

        let mut by_value: IndexMap<i128, Vec<&EnumMember>> = IndexMap::new();
        for member in &body.members {
            by_value.entry(member.value).or_default().push(member);
        }
        for (value, members) in &by_value {
            if members.len() < 2 {
                continue;
            }
            let names: Vec<String> = members.iter().map(|m| format!("'{}'", m.name)).collect();
            out.push(Diagnostic::error(
                &ty.file,
                members[1].position,
                ErrorKind::DuplicateEnumValue,
                format!(
                    "Duplicate value {value} in enum '{}': members {} share it",
                    ty.name,
                    names.join(", ")
                ),
            ));
        }

        if let Some((min, max)) = range {
            for member in &body.members {
                if member.value < min || member.value > max {
                    out.push(Diagnostic::error(
                        &ty.file,
                        member.position,
                        ErrorKind::EnumValueOutOfRange,
                        format!(
                            "Enum value {} for '{}' exceeds {} range (range: {min} to {max})",
                            member.value, member.name, body.storage_type
                        ),
                    ));
                }
            }
        }

        out
    }
}
