//! Resource type definitions and their registry.
//!
//! - [`ResourceTypeDefinition`] - one resource type's schemas and flattened attribute index
//! - [`ResourceTypeRegistry`] - read access to the registered definitions
//! - [`SimpleResourceTypeRegistry`] - registry populated through explicit registration

pub mod definition;
pub mod registry;

pub use definition::{
    ResourceTypeDefinition, ResourceTypeDefinitionBuilder, ResourceTypeResource, SchemaExtension,
    SchemaExtensionReference,
};
pub use registry::{ResourceTypeRegistry, SimpleResourceTypeRegistry};
