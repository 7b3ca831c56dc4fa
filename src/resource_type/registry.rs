//! Registry of resource type definitions.
//!
//! Definitions are registered explicitly while the application starts up.
//! Once populated, a registry is only read, so it can be wrapped in an `Arc`
//! and shared between request handlers.

use super::definition::{ResourceTypeDefinition, ResourceTypeResource};
use crate::error::{ScimError, ScimResult};
use crate::schema::{Schema, SchemaRegistry};

use log::{debug, warn};
use std::sync::Arc;

/// Read access to the resource types known to the server.
pub trait ResourceTypeRegistry: Send + Sync {
    /// All registered resource type definitions.
    fn resource_type_definitions(&self) -> Vec<Arc<ResourceTypeDefinition>>;

    /// Find a definition by resource type name (case-insensitive).
    fn find_by_name(&self, name: &str) -> Option<Arc<ResourceTypeDefinition>> {
        self.resource_type_definitions()
            .into_iter()
            .find(|definition| definition.name().eq_ignore_ascii_case(name))
    }

    /// Find a definition by endpoint (case-insensitive, leading `/` optional).
    fn find_by_endpoint(&self, endpoint: &str) -> Option<Arc<ResourceTypeDefinition>> {
        let wanted = endpoint.trim_start_matches('/');
        self.resource_type_definitions().into_iter().find(|definition| {
            definition
                .endpoint()
                .trim_start_matches('/')
                .eq_ignore_ascii_case(wanted)
        })
    }

    /// ResourceType resources for every discoverable definition.
    fn discoverable_resource_types(&self) -> Vec<ResourceTypeResource> {
        self.resource_type_definitions()
            .iter()
            .filter(|definition| definition.is_discoverable())
            .map(|definition| definition.to_scim_resource())
            .collect()
    }

    /// Schemas used by discoverable definitions.
    ///
    /// Each definition contributes its extension schemas followed by its
    /// core schema. A schema shared by several definitions is listed once.
    fn discoverable_schemas(&self) -> Vec<Schema> {
        let mut schemas: Vec<Schema> = Vec::new();
        for definition in self.resource_type_definitions() {
            if !definition.is_discoverable() {
                continue;
            }
            let extensions = definition
                .schema_extensions()
                .iter()
                .map(|extension| &extension.schema);
            for schema in extensions.chain(definition.core_schema()) {
                if !schemas.iter().any(|known| known.id.eq_ignore_ascii_case(&schema.id)) {
                    schemas.push(schema.clone());
                }
            }
        }
        schemas
    }
}

/// A registry holding the definitions it was given, in registration order.
#[derive(Debug, Clone, Default)]
pub struct SimpleResourceTypeRegistry {
    resource_types: Vec<Arc<ResourceTypeDefinition>>,
}

impl SimpleResourceTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the standard `User` and `Group` resource types.
    pub fn with_standard_types(schemas: &SchemaRegistry) -> ScimResult<Self> {
        let mut registry = Self::new();
        registry.register_resource_type(ResourceTypeDefinition::user(schemas)?)?;
        registry.register_resource_type(ResourceTypeDefinition::group(schemas)?)?;
        Ok(registry)
    }

    /// Register a resource type definition.
    ///
    /// Fails when another definition already uses the same name or endpoint.
    pub fn register_resource_type(
        &mut self,
        definition: ResourceTypeDefinition,
    ) -> ScimResult<Arc<ResourceTypeDefinition>> {
        if let Some(existing) = self.resource_types.iter().find(|existing| {
            existing.name().eq_ignore_ascii_case(definition.name())
                || existing
                    .endpoint()
                    .trim_start_matches('/')
                    .eq_ignore_ascii_case(definition.endpoint().trim_start_matches('/'))
        }) {
            warn!(
                "Rejected resource type '{}' at {}: conflicts with '{}' at {}",
                definition.name(),
                definition.endpoint(),
                existing.name(),
                existing.endpoint()
            );
            return Err(ScimError::invalid_definition(format!(
                "resource type '{}' conflicts with registered resource type '{}'",
                definition.name(),
                existing.name()
            )));
        }

        debug!(
            "Registered resource type '{}' at {} ({} indexed attributes)",
            definition.name(),
            definition.endpoint(),
            definition.attribute_index().len()
        );
        let definition = Arc::new(definition);
        self.resource_types.push(Arc::clone(&definition));
        Ok(definition)
    }

    pub fn len(&self) -> usize {
        self.resource_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resource_types.is_empty()
    }
}

impl ResourceTypeRegistry for SimpleResourceTypeRegistry {
    fn resource_type_definitions(&self) -> Vec<Arc<ResourceTypeDefinition>> {
        self.resource_types.clone()
    }
}
