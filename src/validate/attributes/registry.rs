use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use super::schema::{AttributeSchema, SchemaError};
use crate::config::AttributeConfig;

/// Loaded schemas by name, in registration order.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, Arc<AttributeSchema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every document listed in `custom_schemas`.
    pub fn from_config(config: &AttributeConfig) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        for path in &config.custom_schemas {
            registry.load_path(path)?;
        }
        Ok(registry)
    }

    /// Add a schema, replacing any schema with the same name.
    pub fn register(&mut self, schema: AttributeSchema) {
        debug!(schema = %schema.schema_name, version = %schema.version, "registered schema");
        self.schemas
            .insert(schema.schema_name.clone(), Arc::new(schema));
    }

    pub fn load_yaml_str(&mut self, text: &str) -> Result<(), SchemaError> {
        self.register(AttributeSchema::from_yaml_str(text)?);
        Ok(())
    }

    pub fn load_json_str(&mut self, text: &str) -> Result<(), SchemaError> {
        self.register(AttributeSchema::from_json_str(text)?);
        Ok(())
    }

    pub fn load_path(&mut self, path: &Path) -> Result<(), SchemaError> {
        self.register(AttributeSchema::from_path(path)?);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<AttributeSchema>> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
