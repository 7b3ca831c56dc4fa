//! Schema registry for loading, managing, and accessing SCIM schemas.
//!
//! This module provides the SchemaRegistry which loads the embedded RFC 7643
//! schemas (or schemas from a directory) and hands them out to resource type
//! definitions. Lookups by schema id are case-insensitive.

use super::{embedded, types::AttributeDefinition, types::Schema};
use crate::error::{ScimError, ScimResult};

use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Registry of SCIM schemas.
///
/// Holds the core User and Group schemas, the Enterprise User extension, any
/// schemas added by the application, and the common attribute table shared
/// by every resource type.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    common_attributes: Vec<AttributeDefinition>,
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    /// Create a new schema registry with the embedded schemas.
    pub fn new() -> ScimResult<Self> {
        Self::with_embedded_schemas()
    }

    /// Create a new schema registry with the embedded schemas.
    ///
    /// This doesn't require any schema files on disk.
    pub fn with_embedded_schemas() -> ScimResult<Self> {
        let common = Self::load_schema_from_str(embedded::common_attributes_schema())?;
        let mut registry = Self {
            common_attributes: common.attributes,
            schemas: HashMap::new(),
        };

        for content in [
            embedded::core_user_schema(),
            embedded::core_group_schema(),
            embedded::enterprise_user_schema(),
        ] {
            registry.add_schema(Self::load_schema_from_str(content)?);
        }

        Ok(registry)
    }

    /// Create a schema registry from the embedded schemas plus every `*.json`
    /// schema file found in a directory.
    ///
    /// A file whose id matches an embedded schema replaces it.
    pub fn from_schema_dir<P: AsRef<Path>>(schema_dir: P) -> ScimResult<Self> {
        let mut registry = Self::with_embedded_schemas()?;

        let entries = fs::read_dir(schema_dir.as_ref()).map_err(|e| {
            ScimError::internal(format!(
                "Failed to read schema directory {}: {}",
                schema_dir.as_ref().display(),
                e
            ))
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| ScimError::internal(format!("Failed to read schema entry: {}", e)))?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            registry.add_schema(Self::load_schema_from_file(&path)?);
        }

        Ok(registry)
    }

    /// Load a schema from a JSON file.
    fn load_schema_from_file<P: AsRef<Path>>(path: P) -> ScimResult<Schema> {
        let content = fs::read_to_string(&path).map_err(|e| {
            ScimError::internal(format!(
                "Failed to read schema file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::load_schema_from_str(&content)
    }

    /// Load a schema from a JSON string.
    pub fn load_schema_from_str(content: &str) -> ScimResult<Schema> {
        let schema: Schema = serde_json::from_str(content)?;
        if schema.id.trim().is_empty() {
            return Err(ScimError::invalid_definition("schema id must not be empty"));
        }
        Ok(schema)
    }

    /// Get all available schemas.
    pub fn get_schemas(&self) -> Vec<&Schema> {
        self.schemas.values().collect()
    }

    /// Get a specific schema by ID.
    pub fn get_schema(&self, id: &str) -> Option<&Schema> {
        self.schemas.get(&id.to_ascii_lowercase())
    }

    /// Get the core User schema.
    pub fn get_user_schema(&self) -> Option<&Schema> {
        self.get_schema(super::USER_SCHEMA)
    }

    /// Get the core Group schema.
    pub fn get_group_schema(&self) -> Option<&Schema> {
        self.get_schema(super::GROUP_SCHEMA)
    }

    /// Get the Enterprise User extension schema.
    pub fn get_enterprise_user_schema(&self) -> Option<&Schema> {
        self.get_schema(super::ENTERPRISE_USER_SCHEMA)
    }

    /// Attributes common to every resource (`schemas`, `id`, `externalId`, `meta`).
    pub fn common_attributes(&self) -> &[AttributeDefinition] {
        &self.common_attributes
    }

    /// Add a schema to the registry, replacing any schema with the same id.
    pub fn add_schema(&mut self, schema: Schema) {
        if let Some(previous) = self
            .schemas
            .insert(schema.id.to_ascii_lowercase(), schema)
        {
            log::debug!("Replaced schema {}", previous.id);
        }
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new().expect("Failed to load default schemas")
    }
}
