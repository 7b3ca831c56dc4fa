//! Attribute selection inputs for response shaping.
//!
//! Two sets of paths drive which attributes a response carries:
//!
//! - **request attributes**: the attributes present in the create/replace
//!   request body or targeted by the patch operations, collected with
//!   [`collect_resource_attributes`] and [`collect_patch_attributes`];
//! - **query attributes**: the paths listed in the `attributes` or
//!   `excludedAttributes` query parameter, parsed by [`QueryAttributes::parse`].
//!
//! The collection functions are pure: each call returns a fresh set.

use crate::error::{ScimError, ScimResult};
use crate::path::Path;
use crate::resource_type::ResourceTypeDefinition;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Query parameter holding the allow-list of attributes.
pub const ATTRIBUTES_PARAMETER: &str = "attributes";
/// Query parameter holding the deny-list of attributes.
pub const EXCLUDED_ATTRIBUTES_PARAMETER: &str = "excludedAttributes";

/// PATCH operation kinds (RFC 7644 Section 3.5.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchOpType {
    Add,
    Remove,
    Replace,
}

impl PatchOpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Replace => "replace",
        }
    }
}

impl fmt::Display for PatchOpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PatchOpType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// Some identity providers send "Replace" or "ADD"; operation names are matched case-insensitively.
impl<'de> Deserialize<'de> for PatchOpType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        match value.to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "replace" => Ok(Self::Replace),
            _ => Err(serde::de::Error::custom(format!(
                "unknown patch operation '{}'",
                value
            ))),
        }
    }
}

/// A single PATCH operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOpType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Path>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    pub fn add(path: Option<Path>, value: Value) -> Self {
        Self {
            op: PatchOpType::Add,
            path,
            value: Some(value),
        }
    }

    pub fn replace(path: Option<Path>, value: Value) -> Self {
        Self {
            op: PatchOpType::Replace,
            path,
            value: Some(value),
        }
    }

    pub fn remove(path: Path) -> Self {
        Self {
            op: PatchOpType::Remove,
            path: Some(path),
            value: None,
        }
    }
}

/// A PATCH request body (`urn:ietf:params:scim:api:messages:2.0:PatchOp`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRequest {
    #[serde(default)]
    pub schemas: Vec<String>,
    #[serde(rename = "Operations", alias = "operations")]
    pub operations: Vec<PatchOperation>,
}

impl PatchRequest {
    /// Parse a PATCH request body.
    ///
    /// A body that doesn't have the PatchOp shape is reported as
    /// [`ScimError::InvalidRequest`]; an operation path that doesn't parse
    /// is reported as [`ScimError::InvalidPath`].
    pub fn from_value(value: Value) -> ScimResult<Self> {
        let body: PatchRequestBody =
            serde_json::from_value(value).map_err(|e| ScimError::invalid_request(e.to_string()))?;

        let operations = body
            .operations
            .into_iter()
            .map(|operation| -> ScimResult<PatchOperation> {
                let path = operation.path.as_deref().map(Path::parse).transpose()?;
                Ok(PatchOperation {
                    op: operation.op,
                    path,
                    value: operation.value,
                })
            })
            .collect::<ScimResult<Vec<_>>>()?;

        Ok(Self {
            schemas: body.schemas,
            operations,
        })
    }
}

/// PatchOp body as received, with operation paths still unparsed.
#[derive(Deserialize)]
struct PatchRequestBody {
    #[serde(default)]
    schemas: Vec<String>,
    #[serde(rename = "Operations", alias = "operations")]
    operations: Vec<PatchOperationBody>,
}

#[derive(Deserialize)]
struct PatchOperationBody {
    op: PatchOpType,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    value: Option<Value>,
}

/// Collect the paths of every attribute present in a resource document.
///
/// Top-level schema URN keys hold extension attributes and don't produce a
/// path of their own. Multi-valued attributes don't add a path segment.
pub fn collect_resource_attributes(resource: &Map<String, Value>) -> HashSet<Path> {
    let mut paths = HashSet::new();
    collect_object(&Path::root(), resource, &mut paths);
    paths
}

/// Collect the paths targeted by patch operations.
///
/// Each operation path is normalized and stripped of value filters; object
/// and array values contribute their attributes below that path (or below
/// the resource root when the operation has no path).
pub fn collect_patch_attributes(
    resource_type: &ResourceTypeDefinition,
    operations: &[PatchOperation],
) -> HashSet<Path> {
    let mut paths = HashSet::new();
    for operation in operations {
        let parent = match &operation.path {
            Some(path) => {
                let normalized = resource_type.normalize_path(path).without_filters();
                paths.insert(normalized.clone());
                normalized
            }
            None => Path::root(),
        };
        if let Some(value) = &operation.value {
            collect_value(&parent, value, &mut paths);
        }
    }
    paths
}

fn collect_object(parent: &Path, object: &Map<String, Value>, paths: &mut HashSet<Path>) {
    for (key, value) in object {
        let path = parent.field(key);
        if !path.is_root() {
            paths.insert(path.clone());
        }
        collect_value(&path, value, paths);
    }
}

fn collect_value(parent: &Path, value: &Value, paths: &mut HashSet<Path>) {
    match value {
        Value::Object(object) => collect_object(parent, object, paths),
        Value::Array(items) => {
            for item in items {
                collect_value(parent, item, paths);
            }
        }
        _ => {}
    }
}

/// Paths from the `attributes` or `excludedAttributes` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAttributes {
    paths: HashSet<Path>,
    excluded: bool,
}

impl QueryAttributes {
    /// Parse the query parameters for a resource type.
    ///
    /// A non-empty `attributes` value takes precedence and produces an
    /// allow-list; otherwise a non-empty `excludedAttributes` value produces
    /// a deny-list. Without either, nothing is excluded.
    pub fn parse(
        resource_type: &ResourceTypeDefinition,
        attributes: Option<&str>,
        excluded_attributes: Option<&str>,
    ) -> ScimResult<Self> {
        if let Some(attributes) = attributes.filter(|value| !value.is_empty()) {
            Ok(Self {
                paths: parse_attribute_list(resource_type, ATTRIBUTES_PARAMETER, attributes)?,
                excluded: false,
            })
        } else if let Some(excluded) = excluded_attributes.filter(|value| !value.is_empty()) {
            Ok(Self {
                paths: parse_attribute_list(resource_type, EXCLUDED_ATTRIBUTES_PARAMETER, excluded)?,
                excluded: true,
            })
        } else {
            Ok(Self::none())
        }
    }

    /// No query attributes: nothing is excluded.
    pub fn none() -> Self {
        Self {
            paths: HashSet::new(),
            excluded: true,
        }
    }

    /// An allow-list of already normalized paths.
    pub fn allow(paths: impl IntoIterator<Item = Path>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
            excluded: false,
        }
    }

    /// A deny-list of already normalized paths.
    pub fn exclude(paths: impl IntoIterator<Item = Path>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
            excluded: true,
        }
    }

    pub fn paths(&self) -> &HashSet<Path> {
        &self.paths
    }

    /// Whether the paths came from `excludedAttributes` (or no parameter was given).
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }
}

fn parse_attribute_list(
    resource_type: &ResourceTypeDefinition,
    parameter: &str,
    value: &str,
) -> ScimResult<HashSet<Path>> {
    let paths = value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            Path::parse(token)
                .map(|path| resource_type.normalize_path(&path).without_filters())
                .map_err(|source| ScimError::invalid_attribute_parameter(parameter, token, source))
        })
        .collect::<ScimResult<HashSet<Path>>>()?;

    debug!(
        "Parsed {} path(s) from the {} parameter for resource type '{}'",
        paths.len(),
        parameter,
        resource_type.name()
    );
    Ok(paths)
}

/// The complete selection state for one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    request_attributes: HashSet<Path>,
    query: QueryAttributes,
}

impl AttributeSelector {
    /// A selector with no request attributes.
    pub fn new(query: QueryAttributes) -> Self {
        Self {
            request_attributes: HashSet::new(),
            query,
        }
    }

    /// Use the attributes of a create or replace request body.
    pub fn with_request_resource(mut self, request: &Map<String, Value>) -> Self {
        self.request_attributes = collect_resource_attributes(request);
        self
    }

    /// Use the attributes targeted by patch operations.
    pub fn with_patch_operations(
        mut self,
        resource_type: &ResourceTypeDefinition,
        operations: &[PatchOperation],
    ) -> Self {
        self.request_attributes = collect_patch_attributes(resource_type, operations);
        self
    }

    pub fn request_attributes(&self) -> &HashSet<Path> {
        &self.request_attributes
    }

    pub fn query_attributes(&self) -> &HashSet<Path> {
        self.query.paths()
    }

    pub fn is_excluded(&self) -> bool {
        self.query.is_excluded()
    }
}
