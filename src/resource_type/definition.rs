//! Compiled resource type definitions.
//!
//! A [`ResourceTypeDefinition`] describes one SCIM resource type (its core
//! schema and schema extensions) and flattens every attribute declared by
//! those schemas into an index keyed by normalized [`Path`]. The index is
//! built once at registration time and never changes afterwards, so a
//! definition can be shared between request handlers without locking.

use crate::error::{ScimError, ScimResult};
use crate::path::Path;
use crate::schema::{AttributeDefinition, RESOURCE_TYPE_SCHEMA, Returned, Schema, SchemaRegistry};
use crate::schema::embedded;

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A schema extension attached to a resource type.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaExtension {
    /// The extension schema
    pub schema: Schema,
    /// Whether resources of this type must carry the extension
    pub required: bool,
}

/// Declaration of a resource type including all of its schemas.
#[derive(Debug, Clone)]
pub struct ResourceTypeDefinition {
    id: Option<String>,
    name: String,
    description: Option<String>,
    endpoint: String,
    core_schema: Option<Schema>,
    schema_extensions: Vec<SchemaExtension>,
    attribute_index: HashMap<Path, AttributeDefinition>,
    discoverable: bool,
}

impl ResourceTypeDefinition {
    /// Start building a resource type definition.
    pub fn builder() -> ResourceTypeDefinitionBuilder {
        ResourceTypeDefinitionBuilder::default()
    }

    /// The standard `User` resource type served at `/Users`, with the
    /// Enterprise User extension as an optional extension.
    pub fn user(schemas: &SchemaRegistry) -> ScimResult<Self> {
        let core = schemas
            .get_user_schema()
            .ok_or_else(|| ScimError::invalid_definition("User schema is not registered"))?;
        let enterprise = schemas.get_enterprise_user_schema().ok_or_else(|| {
            ScimError::invalid_definition("Enterprise User schema is not registered")
        })?;

        Self::builder()
            .name("User")
            .description("User Account")
            .endpoint("/Users")
            .core_schema(core.clone())
            .schema_extension(enterprise.clone(), false)
            .common_attributes(schemas.common_attributes().to_vec())
            .build()
    }

    /// The standard `Group` resource type served at `/Groups`.
    pub fn group(schemas: &SchemaRegistry) -> ScimResult<Self> {
        let core = schemas
            .get_group_schema()
            .ok_or_else(|| ScimError::invalid_definition("Group schema is not registered"))?;

        Self::builder()
            .name("Group")
            .description("Group")
            .endpoint("/Groups")
            .core_schema(core.clone())
            .common_attributes(schemas.common_attributes().to_vec())
            .build()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn core_schema(&self) -> Option<&Schema> {
        self.core_schema.as_ref()
    }

    pub fn schema_extensions(&self) -> &[SchemaExtension] {
        &self.schema_extensions
    }

    pub fn is_discoverable(&self) -> bool {
        self.discoverable
    }

    /// Every indexed attribute path with its definition.
    pub fn attribute_index(&self) -> &HashMap<Path, AttributeDefinition> {
        &self.attribute_index
    }

    /// Retrieve the attribute definition for the attribute in the path.
    ///
    /// Returns `None` when the schemas don't declare the attribute; callers
    /// treat such attributes as [`Returned::Default`].
    pub fn attribute_definition(&self, path: &Path) -> Option<&AttributeDefinition> {
        self.attribute_index
            .get(&self.normalize_path(path).without_filters())
    }

    /// The returned characteristic of the attribute in the path.
    pub fn returned(&self, path: &Path) -> Returned {
        self.attribute_definition(path)
            .map(|definition| definition.returned)
            .unwrap_or_default()
    }

    /// Normalize a path by removing the schema URN for core attributes.
    ///
    /// A path naming a whole schema (`urn:...:2.0:User` parses as attribute
    /// `User` under `urn:...:2.0`) is re-rooted at that schema first.
    /// Extension paths are otherwise left untouched.
    pub fn normalize_path(&self, path: &Path) -> Path {
        let Some(urn) = path.schema_urn() else {
            return path.clone();
        };

        if let Some(first) = path.elements().first().filter(|e| e.filter().is_none()) {
            let candidate = format!("{}:{}", urn, first.name());
            if let Some(schema_id) = self
                .schema_ids()
                .find(|id| id.eq_ignore_ascii_case(&candidate))
            {
                let rerooted = Path::from_parts(
                    Some(schema_id.to_string()),
                    path.elements()[1..].to_vec(),
                );
                return self.strip_core_schema(rerooted);
            }
        }

        self.strip_core_schema(path.clone())
    }

    fn strip_core_schema(&self, path: Path) -> Path {
        match (path.schema_urn(), &self.core_schema) {
            (Some(urn), Some(core)) if urn.eq_ignore_ascii_case(&core.id) => {
                path.without_schema_urn()
            }
            _ => path,
        }
    }

    fn schema_ids(&self) -> impl Iterator<Item = &str> {
        self.core_schema
            .iter()
            .map(|schema| schema.id.as_str())
            .chain(
                self.schema_extensions
                    .iter()
                    .map(|extension| extension.schema.id.as_str()),
            )
    }

    /// The ResourceType discovery resource (RFC 7643 Section 6) for this definition.
    pub fn to_scim_resource(&self) -> ResourceTypeResource {
        ResourceTypeResource {
            schemas: vec![RESOURCE_TYPE_SCHEMA.to_string()],
            id: self.id.clone().unwrap_or_else(|| self.name.clone()),
            name: self.name.clone(),
            description: self.description.clone(),
            endpoint: self.endpoint.clone(),
            schema: self.core_schema.as_ref().map(|schema| schema.id.clone()),
            schema_extensions: self
                .schema_extensions
                .iter()
                .map(|extension| SchemaExtensionReference {
                    schema: extension.schema.id.clone(),
                    required: extension.required,
                })
                .collect(),
        }
    }
}

/// Builder for [`ResourceTypeDefinition`].
#[derive(Debug, Clone)]
pub struct ResourceTypeDefinitionBuilder {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    endpoint: Option<String>,
    core_schema: Option<Schema>,
    schema_extensions: Vec<SchemaExtension>,
    common_attributes: Option<Vec<AttributeDefinition>>,
    discoverable: bool,
}

impl Default for ResourceTypeDefinitionBuilder {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            description: None,
            endpoint: None,
            core_schema: None,
            schema_extensions: Vec::new(),
            common_attributes: None,
            discoverable: true,
        }
    }
}

impl ResourceTypeDefinitionBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn core_schema(mut self, schema: Schema) -> Self {
        self.core_schema = Some(schema);
        self
    }

    /// Attach a schema extension. Extensions are indexed in the order added.
    pub fn schema_extension(mut self, schema: Schema, required: bool) -> Self {
        self.schema_extensions
            .push(SchemaExtension { schema, required });
        self
    }

    /// Override the common attribute table (defaults to the embedded RFC 7643 table).
    pub fn common_attributes(mut self, attributes: Vec<AttributeDefinition>) -> Self {
        self.common_attributes = Some(attributes);
        self
    }

    pub fn discoverable(mut self, discoverable: bool) -> Self {
        self.discoverable = discoverable;
        self
    }

    /// Build the definition and its attribute index.
    ///
    /// Fails when the name or endpoint is missing.
    pub fn build(self) -> ScimResult<ResourceTypeDefinition> {
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ScimError::invalid_definition("name must not be empty"))?;
        let endpoint = self
            .endpoint
            .filter(|endpoint| !endpoint.trim().is_empty())
            .ok_or_else(|| {
                ScimError::invalid_definition(format!(
                    "endpoint must not be empty for resource type '{}'",
                    name
                ))
            })?;

        let common_attributes = match self.common_attributes {
            Some(attributes) => attributes,
            None => {
                SchemaRegistry::load_schema_from_str(embedded::common_attributes_schema())?
                    .attributes
            }
        };

        let mut index = AttributeIndex::new(&name);
        index.add(&Path::root(), &common_attributes);
        if let Some(core) = &self.core_schema {
            index.add(&Path::root(), &core.attributes);
        }
        for extension in &self.schema_extensions {
            index.add(
                &Path::root_with_schema(extension.schema.id.clone()),
                &extension.schema.attributes,
            );
        }
        let attribute_index = index.entries;

        Ok(ResourceTypeDefinition {
            id: self.id,
            name,
            description: self.description,
            endpoint,
            core_schema: self.core_schema,
            schema_extensions: self.schema_extensions,
            attribute_index,
            discoverable: self.discoverable,
        })
    }
}

/// Accumulates the flattened attribute index while a definition is built.
struct AttributeIndex<'a> {
    resource_type: &'a str,
    entries: HashMap<Path, AttributeDefinition>,
}

impl<'a> AttributeIndex<'a> {
    fn new(resource_type: &'a str) -> Self {
        Self {
            resource_type,
            entries: HashMap::new(),
        }
    }

    fn add(&mut self, parent: &Path, attributes: &[AttributeDefinition]) {
        for attribute in attributes {
            let path = parent.attribute(attribute.name.clone());
            // Last definition wins; a repeated path usually means two schemas
            // declare the same attribute.
            if self.entries.insert(path.clone(), attribute.clone()).is_some() {
                warn!(
                    "Resource type '{}' declares attribute '{}' more than once; using the last definition",
                    self.resource_type, path
                );
            }
            if !attribute.sub_attributes.is_empty() {
                self.add(&path, &attribute.sub_attributes);
            }
        }
    }
}

/// Reference to an extension schema in a ResourceType resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaExtensionReference {
    pub schema: String,
    pub required: bool,
}

/// The SCIM ResourceType resource (RFC 7643 Section 6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeResource {
    pub schemas: Vec<String>,
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schema_extensions: Vec<SchemaExtensionReference>,
}
