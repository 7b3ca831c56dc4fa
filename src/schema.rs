//! Schema definitions for SCIM resources.
//!
//! This module provides the schema model and registry implementing the
//! RFC 7643 core schemas. Resource type definitions consume schemas from
//! here to build their attribute index.
//!
//! # Key Types
//!
//! - [`Schema`] - SCIM schema definition with attributes and metadata
//! - [`SchemaRegistry`] - Registry for managing and accessing schemas
//! - [`AttributeDefinition`] - Individual attribute specifications and constraints
//! - [`Returned`] - When an attribute appears in responses
//!
//! # Examples
//!
//! ```rust
//! use scim_trim::schema::{Returned, SchemaRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SchemaRegistry::new()?;
//! let user_schema = registry.get_user_schema().expect("embedded");
//! let password = user_schema.attributes.iter().find(|a| a.name == "password");
//! assert_eq!(password.map(|a| a.returned), Some(Returned::Never));
//! # Ok(())
//! # }
//! ```

pub mod embedded;
pub mod registry;
pub mod types;


// Re-export the main types for convenience
pub use registry::SchemaRegistry;
pub use types::{AttributeDefinition, AttributeType, Mutability, Returned, Schema, Uniqueness};

/// Core User schema URN.
pub const USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
/// Core Group schema URN.
pub const GROUP_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";
/// Enterprise User extension schema URN.
pub const ENTERPRISE_USER_SCHEMA: &str =
    "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";
/// Schema URN of the ResourceType discovery resource.
pub const RESOURCE_TYPE_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:ResourceType";
/// Schema URN of the Schema discovery resource.
pub const SCHEMA_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:Schema";
