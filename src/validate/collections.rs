//! Collection dimension checks.
//!
//! Runs over the raw syntax tree rather than the extracted model, so nested
//! collections and collections inside fields the extractor dropped are still
//! checked.

use std::path::Path;

use crate::base::CollectionKind;
use crate::hir::{Diagnostic, ErrorKind};
use crate::parser::ast::{self, AstNode, CollectionTypeExpr, DimensionValue};
use crate::parser::ParsedSource;

#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionValidator;

impl CollectionValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, path: &Path, tree: &ParsedSource) -> Vec<Diagnostic> {
        let Some(root) = ast::SourceFile::cast(tree.syntax()) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for collection in root.collection_types() {
            self.check(path, tree, &collection, &mut out);
        }
        out
    }

    fn check(
        &self,
        path: &Path,
        tree: &ParsedSource,
        collection: &CollectionTypeExpr,
        out: &mut Vec<Diagnostic>,
    ) {
        let Some(kind) = collection.kind() else {
            return;
        };
        let position = tree.node_position(collection.syntax());
        let dims: Vec<ast::Dimension> = collection.dimensions().collect();

        for dim in &dims {
            let message = if dim.size_overflows() {
                let text = dim.size_text().unwrap_or_default();
                format!("Size {text} in {kind} does not fit in a 64-bit integer")
            } else {
                match dim.value() {
                    Some(DimensionValue::Fixed(n)) if n <= 0 => {
                        format!("Fixed size must be > 0 in {kind}, got {n}")
                    }
                    Some(DimensionValue::Max(n)) if n <= 0 => {
                        format!("Max size must be > 0 in {kind}, got max={n}")
                    }
                    Some(_) => continue,
                    None => format!("Missing size in {kind}"),
                }
            };
            out.push(Diagnostic::error(
                path,
                position,
                ErrorKind::InvalidCollectionSize,
                message,
            ));
        }

        match kind {
            CollectionKind::Matrix if dims.len() != 2 => out.push(Diagnostic::error(
                path,
                position,
                ErrorKind::InvalidMatrixDimensions,
                format!("Matrix must have exactly 2 dimensions, found {}", dims.len()),
            )),
            CollectionKind::Tensor if dims.is_empty() => out.push(Diagnostic::error(
                path,
                position,
                ErrorKind::InvalidTensorDimensions,
                "Tensor must have at least 1 dimension",
            )),
            _ => {}
        }
    }
}
