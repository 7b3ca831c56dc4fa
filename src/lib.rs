//! SCIM 2.0 response shaping for Rust.
//!
//! Decides which attributes of a SCIM resource appear in a response, from
//! the schema's `returned` characteristic, the attributes of the request
//! and the `attributes`/`excludedAttributes` query parameters (RFC 7644
//! Section 3.9).
//!
//! # Core Components
//!
//! - [`Path`] - Namespace-aware attribute path
//! - [`ResourceTypeDefinition`] - A resource type with its flattened attribute index
//! - [`ResourceTrimmer`] - Copies a resource keeping only selected attributes
//! - [`ResourcePreparer`] - Trims the resources returned by one request
//! - [`ResponseShaper`] - Looks up resource types and creates preparers
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use scim_trim::{ResponseShaper, ScimServerConfig, SchemaRegistry, SimpleResourceTypeRegistry};
//! use scim_trim::resource::GenericScimResource;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SimpleResourceTypeRegistry::with_standard_types(&SchemaRegistry::new()?)?;
//! let shaper = ResponseShaper::new(Arc::new(registry), ScimServerConfig::default());
//!
//! let preparer = shaper.prepare("User", None, Some("password"))?;
//! let stored = GenericScimResource::from_value(json!({
//!     "userName": "bob", "password": "x", "id": "1"
//! }))?;
//! let response = preparer.trim_retrieved(&stored);
//! assert_eq!(
//!     response.into_value(),
//!     json!({
//!         "userName": "bob",
//!         "id": "1",
//!         "meta": {"resourceType": "User", "location": "https://localhost/v2/Users/1"}
//!     })
//! );
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod path;
pub mod preparer;
pub mod resource;
pub mod resource_type;
pub mod schema;
pub mod selector;
pub mod shaper;
pub mod trimmer;

// Re-export commonly used types for convenience
pub use config::{BaseUrlProvider, ScimServerConfig, StaticBaseUrlProvider};
pub use error::{PathError, ScimError, ScimResult};
pub use path::Path;
pub use preparer::ResourcePreparer;
pub use resource::GenericScimResource;
pub use resource_type::{ResourceTypeDefinition, ResourceTypeRegistry, SimpleResourceTypeRegistry};
pub use schema::{AttributeDefinition, Returned, Schema, SchemaRegistry};
pub use selector::{AttributeSelector, PatchOperation, PatchRequest, QueryAttributes};
pub use shaper::ResponseShaper;
pub use trimmer::{ResourceTrimmer, ScimResourceTrimmer};
