//! Entry point for HTTP layers.
//!
//! [`ResponseShaper`] owns the resource type registry and the endpoint URL
//! configuration, and hands out a [`ResourcePreparer`] per request.

use crate::config::{BaseUrlProvider, ScimServerConfig};
use crate::error::{ScimError, ScimResult};
use crate::preparer::ResourcePreparer;
use crate::resource_type::ResourceTypeRegistry;
use crate::schema::SCHEMA_SCHEMA;

use log::debug;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Builds per-request preparers for the registered resource types.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use scim_trim::config::ScimServerConfig;
/// use scim_trim::resource_type::SimpleResourceTypeRegistry;
/// use scim_trim::schema::SchemaRegistry;
/// use scim_trim::shaper::ResponseShaper;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = SimpleResourceTypeRegistry::with_standard_types(&SchemaRegistry::new()?)?;
/// let shaper = ResponseShaper::new(
///     Arc::new(registry),
///     ScimServerConfig::new("https://scim.example.com"),
/// );
///
/// let preparer = shaper.prepare("User", None, Some("password"))?;
/// assert_eq!(preparer.base_uri(), "https://scim.example.com/v2/Users");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ResponseShaper {
    registry: Arc<dyn ResourceTypeRegistry>,
    base_url: Arc<dyn BaseUrlProvider>,
}

impl ResponseShaper {
    /// Create a shaper using a server configuration for endpoint URLs.
    pub fn new(registry: Arc<dyn ResourceTypeRegistry>, config: ScimServerConfig) -> Self {
        Self::with_base_url_provider(registry, Arc::new(config))
    }

    /// Create a shaper using any base URL provider.
    pub fn with_base_url_provider(
        registry: Arc<dyn ResourceTypeRegistry>,
        base_url: Arc<dyn BaseUrlProvider>,
    ) -> Self {
        Self { registry, base_url }
    }

    pub fn registry(&self) -> &dyn ResourceTypeRegistry {
        self.registry.as_ref()
    }

    /// Create the preparer for a request against a resource type.
    ///
    /// The resource type is looked up by name, then by endpoint.
    ///
    /// # Errors
    ///
    /// * [`ScimError::UnsupportedResourceType`] when no such resource type is registered
    /// * [`ScimError::InvalidAttributeParameter`] when a query parameter entry is malformed
    pub fn prepare(
        &self,
        resource_type: &str,
        attributes: Option<&str>,
        excluded_attributes: Option<&str>,
    ) -> ScimResult<ResourcePreparer> {
        let definition = self
            .registry
            .find_by_name(resource_type)
            .or_else(|| self.registry.find_by_endpoint(resource_type))
            .ok_or_else(|| ScimError::UnsupportedResourceType(resource_type.to_string()))?;

        let base_uri = format!(
            "{}/{}",
            self.base_url.base_url().trim_end_matches('/'),
            definition.endpoint().trim_start_matches('/')
        );
        debug!("Preparing '{}' response at {}", definition.name(), base_uri);

        ResourcePreparer::new(definition, attributes, excluded_attributes, base_uri)
    }

    /// ResourceType resources for discovery, with `meta.location` filled in.
    pub fn resource_types(&self) -> Vec<Value> {
        self.registry
            .discoverable_resource_types()
            .into_iter()
            .filter_map(|resource| {
                let id = resource.id.clone();
                self.with_discovery_meta(&resource, "ResourceType", "ResourceTypes", &id)
            })
            .collect()
    }

    /// Schema resources for discovery (RFC 7643 Section 7).
    ///
    /// Lists the extension schemas and core schema of every discoverable
    /// resource type, each schema once.
    pub fn schemas(&self) -> Vec<Value> {
        self.registry
            .discoverable_schemas()
            .into_iter()
            .filter_map(|schema| {
                let mut value = self.with_discovery_meta(&schema, "Schema", "Schemas", &schema.id)?;
                value
                    .as_object_mut()?
                    .insert("schemas".to_string(), json!([SCHEMA_SCHEMA]));
                Some(value)
            })
            .collect()
    }

    fn with_discovery_meta<T: Serialize>(
        &self,
        resource: &T,
        resource_type: &str,
        endpoint: &str,
        id: &str,
    ) -> Option<Value> {
        let location = format!(
            "{}/{}/{}",
            self.base_url.base_url().trim_end_matches('/'),
            endpoint,
            id
        );
        let mut value = serde_json::to_value(resource).ok()?;
        value.as_object_mut()?.insert(
            "meta".to_string(),
            json!({"resourceType": resource_type, "location": location}),
        );
        Some(value)
    }
}

impl std::fmt::Debug for ResponseShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseShaper")
            .field("base_url", &self.base_url.base_url())
            .field(
                "resource_types",
                &self
                    .registry
                    .resource_type_definitions()
                    .iter()
                    .map(|definition| definition.name().to_string())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
