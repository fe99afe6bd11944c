//! Symbol table — every definition of a run, keyed by qualified name.
//!
//! Registration is last-writer-wins: a second definition with the same
//! qualified name replaces the first and the overwrite is logged at debug
//! level. Lookups follow the file's namespace, its `using namespace`
//! directives, and its namespace aliases.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace};

use super::model::{AliasDefinition, ConstantDefinition, SourceFile, TypeDefinition, TypeRef};
use crate::base::{CollectionKind, PrimitiveType};

/// What a field's [`TypeRef`] refers to.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedType {
    Primitive(PrimitiveType),
    /// A collection; its element type is resolved separately.
    Collection(CollectionKind),
    Alias(Arc<AliasDefinition>),
    User(Arc<TypeDefinition>),
    Unresolved(Arc<str>),
}

impl ResolvedType {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, ResolvedType::Unresolved(_))
    }
}

/// Counts reported with a validation result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SymbolStatistics {
    pub types: usize,
    pub constants: usize,
    pub aliases: usize,
    pub files: usize,
    pub namespaces: usize,
}

/// Index of files, types, constants, and aliases.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    files: IndexMap<PathBuf, Arc<SourceFile>>,
    types: IndexMap<Arc<str>, Arc<TypeDefinition>>,
    constants: IndexMap<Arc<str>, Arc<ConstantDefinition>>,
    aliases: IndexMap<Arc<str>, Arc<AliasDefinition>>,
}

impl SymbolTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    pub fn register_file(&mut self, file: SourceFile) -> Arc<SourceFile> {
        let file = Arc::new(file);
        debug!(file = %file.path.display(), types = file.types.len(), "registered file");
        self.files.insert(file.path.clone(), Arc::clone(&file));
        file
    }

    /// Register every type, constant, and alias of `file`.
    pub fn register_definitions(&mut self, file: &SourceFile) {
        for ty in &file.types {
            self.register_type(Arc::clone(ty));
        }
        for constant in &file.constants {
            self.register_constant(Arc::clone(constant));
        }
        for alias in &file.aliases {
            self.register_alias(Arc::clone(alias));
        }
    }

    pub fn register_type(&mut self, ty: Arc<TypeDefinition>) {
        if let Some(previous) = self.types.insert(Arc::clone(&ty.qualified_name), Arc::clone(&ty)) {
            debug!(
                name = %ty.qualified_name,
                previous = %previous.file.display(),
                current = %ty.file.display(),
                "type definition overwritten"
            );
        }
    }

    pub fn register_constant(&mut self, constant: Arc<ConstantDefinition>) {
        let key = Arc::clone(&constant.qualified_name);
        if self.constants.insert(key, constant).is_some() {
            debug!("constant definition overwritten");
        }
    }

    pub fn register_alias(&mut self, alias: Arc<AliasDefinition>) {
        let key = Arc::clone(&alias.qualified_name);
        if self.aliases.insert(key, alias).is_some() {
            debug!("alias definition overwritten");
        }
    }

    /// Clear all state.
    pub fn clear(&mut self) {
        self.files.clear();
        self.types.clear();
        self.constants.clear();
        self.aliases.clear();
    }

    // ========================================================================
    // LOOKUP
    // ========================================================================

    /// Look up a type as seen from `context`.
    ///
    /// Tries the name as given, then qualified with the context namespace,
    /// then under each `using namespace` target, then with a leading
    /// namespace alias expanded.
    pub fn lookup_type(&self, name: &str, context: &SourceFile) -> Option<Arc<TypeDefinition>> {
        trace!(name, file = %context.path.display(), "lookup type");
        if let Some(found) = self.lookup_in(&self.types, name, context) {
            return Some(found);
        }

        for namespace in &context.using_namespaces {
            if let Some(found) = self.types.get(format!("{namespace}::{name}").as_str()) {
                return Some(Arc::clone(found));
            }
        }

        for (alias, target) in &context.namespace_aliases {
            let Some(rest) = name
                .strip_prefix(alias.as_ref())
                .and_then(|rest| rest.strip_prefix("::"))
            else {
                continue;
            };
            if let Some(found) = self.types.get(format!("{target}::{rest}").as_str()) {
                return Some(Arc::clone(found));
            }
        }

        None
    }

    pub fn lookup_constant(
        &self,
        name: &str,
        context: &SourceFile,
    ) -> Option<Arc<ConstantDefinition>> {
        self.lookup_in(&self.constants, name, context)
    }

    pub fn lookup_alias(&self, name: &str, context: &SourceFile) -> Option<Arc<AliasDefinition>> {
        self.lookup_in(&self.aliases, name, context)
    }

    /// The name as given, then qualified with the context namespace.
    fn lookup_in<T>(
        &self,
        map: &IndexMap<Arc<str>, Arc<T>>,
        name: &str,
        context: &SourceFile,
    ) -> Option<Arc<T>> {
        map.get(name)
            .or_else(|| map.get(context.qualify(name).as_ref()))
            .cloned()
    }

    /// Classify a field type. Collections are not descended into.
    pub fn resolve_type_ref(&self, ty: &TypeRef, context: &SourceFile) -> ResolvedType {
        match ty {
            TypeRef::Primitive(primitive) => ResolvedType::Primitive(*primitive),
            TypeRef::Collection(collection) => ResolvedType::Collection(collection.kind),
            TypeRef::Named(name) => {
                if let Some(definition) = self.lookup_type(name, context) {
                    ResolvedType::User(definition)
                } else if let Some(alias) = self.lookup_alias(name, context) {
                    ResolvedType::Alias(alias)
                } else {
                    ResolvedType::Unresolved(Arc::clone(name))
                }
            }
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn type_exists(&self, qualified_name: &str) -> bool {
        self.types.contains_key(qualified_name)
    }

    pub fn get_type(&self, qualified_name: &str) -> Option<&Arc<TypeDefinition>> {
        self.types.get(qualified_name)
    }

    pub fn get_file(&self, path: &Path) -> Option<&Arc<SourceFile>> {
        self.files.get(path)
    }

    /// Registered files in registration order.
    pub fn files(&self) -> impl Iterator<Item = &Arc<SourceFile>> {
        self.files.values()
    }

    pub fn all_types(&self) -> impl Iterator<Item = &Arc<TypeDefinition>> {
        self.types.values()
    }

    /// Types declared in `namespace` or any namespace nested below it.
    pub fn types_in_namespace(&self, namespace: &str) -> Vec<&Arc<TypeDefinition>> {
        let prefix = format!("{namespace}::");
        self.types
            .values()
            .filter(|ty| {
                ty.qualified_name.starts_with(&prefix) || namespace_of(&ty.qualified_name) == namespace
            })
            .collect()
    }

    pub fn types_in_file(&self, path: &Path) -> Vec<&Arc<TypeDefinition>> {
        self.types.values().filter(|ty| ty.file == path).collect()
    }

    /// Distinct namespaces of all registered files, sorted.
    pub fn all_namespaces(&self) -> Vec<Arc<str>> {
        self.files
            .values()
            .map(|file| Arc::clone(&file.namespace))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn statistics(&self) -> SymbolStatistics {
        SymbolStatistics {
            types: self.types.len(),
            constants: self.constants.len(),
            aliases: self.aliases.len(),
            files: self.files.len(),
            namespaces: self.all_namespaces().len(),
        }
    }
}

/// Everything before the last `::`, or the empty root namespace.
fn namespace_of(qualified_name: &str) -> &str {
    qualified_name
        .rfind("::")
        .map_or("", |idx| &qualified_name[..idx])
}
