//! Response preparation for one SCIM request.
//!
//! A [`ResourcePreparer`] is built per request from the resource type and
//! the `attributes`/`excludedAttributes` query parameters. It trims the
//! resources returned by each kind of operation and fills in the
//! server-managed `meta.resourceType` and `meta.location` values.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use scim_trim::preparer::ResourcePreparer;
//! use scim_trim::resource::GenericScimResource;
//! use scim_trim::resource_type::ResourceTypeDefinition;
//! use scim_trim::schema::SchemaRegistry;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schemas = SchemaRegistry::new()?;
//! let users = Arc::new(ResourceTypeDefinition::user(&schemas)?);
//! let preparer = ResourcePreparer::new(users, Some("userName"), None, "https://example.com/v2/Users")?;
//!
//! let stored = GenericScimResource::from_value(json!({
//!     "id": "1", "userName": "bob", "password": "x"
//! }))?;
//! let response = preparer.trim_retrieved(&stored);
//! assert_eq!(response.into_value(), json!({"id": "1", "userName": "bob"}));
//! # Ok(())
//! # }
//! ```

use crate::error::ScimResult;
use crate::path::Path;
use crate::resource::GenericScimResource;
use crate::resource_type::ResourceTypeDefinition;
use crate::selector::{
    collect_patch_attributes, collect_resource_attributes, PatchOperation, QueryAttributes,
};
use crate::trimmer::{ResourceTrimmer, ScimResourceTrimmer};

use log::debug;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Trims resources returned for a single request.
#[derive(Debug, Clone)]
pub struct ResourcePreparer {
    resource_type: Arc<ResourceTypeDefinition>,
    query: QueryAttributes,
    base_uri: String,
}

impl ResourcePreparer {
    /// Create a preparer for a request.
    ///
    /// * `attributes` - value of the `attributes` query parameter
    /// * `excluded_attributes` - value of the `excludedAttributes` query parameter
    /// * `base_uri` - URI of the resource type endpoint, used to build `meta.location`
    ///
    /// # Errors
    ///
    /// Returns [`ScimError::InvalidAttributeParameter`](crate::error::ScimError::InvalidAttributeParameter)
    /// when a query parameter entry is not a valid attribute path.
    pub fn new(
        resource_type: Arc<ResourceTypeDefinition>,
        attributes: Option<&str>,
        excluded_attributes: Option<&str>,
        base_uri: impl Into<String>,
    ) -> ScimResult<Self> {
        let query = QueryAttributes::parse(&resource_type, attributes, excluded_attributes)?;
        debug!(
            "Prepared '{}' responses with {} {} path(s)",
            resource_type.name(),
            query.paths().len(),
            if query.is_excluded() { "excluded" } else { "requested" }
        );
        Ok(Self {
            resource_type,
            query,
            base_uri: base_uri.into(),
        })
    }

    /// Create a preparer from already parsed query attributes.
    pub fn with_query(
        resource_type: Arc<ResourceTypeDefinition>,
        query: QueryAttributes,
        base_uri: impl Into<String>,
    ) -> Self {
        Self {
            resource_type,
            query,
            base_uri: base_uri.into(),
        }
    }

    pub fn resource_type(&self) -> &ResourceTypeDefinition {
        &self.resource_type
    }

    pub fn query_attributes(&self) -> &QueryAttributes {
        &self.query
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Trim a resource returned by a retrieve or search operation.
    ///
    /// Like the other `trim_*` methods, `meta.resourceType` and
    /// `meta.location` are filled in before trimming, so they appear in the
    /// response unless the query parameters leave them out.
    pub fn trim_retrieved(&self, resource: &GenericScimResource) -> GenericScimResource {
        self.trim(resource, &HashSet::new())
    }

    /// Trim the resource returned by a create operation.
    ///
    /// Attributes with `returned: request` are kept when the create request
    /// carried them.
    pub fn trim_created(
        &self,
        resource: &GenericScimResource,
        request: Option<&GenericScimResource>,
    ) -> GenericScimResource {
        let request_attributes = self.request_resource_attributes(request);
        self.trim(resource, &request_attributes)
    }

    /// Trim the resource returned by a replace operation.
    pub fn trim_replaced(
        &self,
        resource: &GenericScimResource,
        request: Option<&GenericScimResource>,
    ) -> GenericScimResource {
        let request_attributes = self.request_resource_attributes(request);
        self.trim(resource, &request_attributes)
    }

    /// Trim the resource returned by a modify (PATCH) operation.
    ///
    /// Attributes with `returned: request` are kept when a patch operation
    /// targeted them.
    pub fn trim_modified(
        &self,
        resource: &GenericScimResource,
        operations: Option<&[PatchOperation]>,
    ) -> GenericScimResource {
        let request_attributes = match operations {
            Some(operations) => {
                let collected = collect_patch_attributes(&self.resource_type, operations);
                debug!(
                    "Collected {} attribute(s) from {} patch operation(s)",
                    collected.len(),
                    operations.len()
                );
                collected
            }
            None => HashSet::new(),
        };
        self.trim(resource, &request_attributes)
    }

    /// Set `meta.resourceType` and `meta.location` when they are not already set.
    ///
    /// The location is the base URI followed by the resource id, or the base
    /// URI alone when the resource has no id.
    pub fn set_resource_type_and_location(&self, resource: &mut GenericScimResource) {
        let location = match resource.id() {
            Some(id) => format!("{}/{}", self.base_uri.trim_end_matches('/'), id),
            None => self.base_uri.clone(),
        };

        let resource_type = self.resource_type.name();
        resource.update_meta(|meta| {
            if meta.get("resourceType").is_none_or(Value::is_null) {
                meta.insert(
                    "resourceType".to_string(),
                    Value::String(resource_type.to_string()),
                );
            }
            if meta.get("location").is_none_or(Value::is_null) {
                meta.insert("location".to_string(), Value::String(location));
            }
        });
    }

    fn request_resource_attributes(&self, request: Option<&GenericScimResource>) -> HashSet<Path> {
        match request {
            Some(request) => {
                let collected = collect_resource_attributes(request.as_object());
                debug!(
                    "Collected {} attribute(s) from the '{}' request",
                    collected.len(),
                    self.resource_type.name()
                );
                collected
            }
            None => HashSet::new(),
        }
    }

    /// Fill in `meta` on a copy of the resource, then trim the copy.
    fn trim(
        &self,
        resource: &GenericScimResource,
        request_attributes: &HashSet<Path>,
    ) -> GenericScimResource {
        let mut finalized = resource.clone();
        self.set_resource_type_and_location(&mut finalized);

        let trimmer = ScimResourceTrimmer::new(
            &self.resource_type,
            request_attributes,
            self.query.paths(),
            self.query.is_excluded(),
        );
        GenericScimResource::from_object(trimmer.trim_object(finalized.as_object()))
    }
}
