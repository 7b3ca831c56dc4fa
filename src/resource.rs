//! Generic SCIM resource representation.
//!
//! Response shaping works on a single canonical form: the resource as a JSON
//! object. Typed resources are converted into that form at the edges with
//! [`GenericScimResource::from_resource`] and back with
//! [`GenericScimResource::to_resource`].

use crate::error::{ScimError, ScimResult};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A SCIM resource held as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenericScimResource(Map<String, Value>);

impl GenericScimResource {
    /// Create an empty resource.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON object.
    pub fn from_object(object: Map<String, Value>) -> Self {
        Self(object)
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> ScimResult<Self> {
        match value {
            Value::Object(object) => Ok(Self(object)),
            other => Err(ScimError::invalid_request(format!(
                "a SCIM resource must be a JSON object, got {}",
                json_type(&other)
            ))),
        }
    }

    /// Convert a typed resource into its generic form.
    pub fn from_resource<T: Serialize>(resource: &T) -> ScimResult<Self> {
        Self::from_value(serde_json::to_value(resource)?)
    }

    /// Convert the generic form back into a typed resource.
    pub fn to_resource<T: DeserializeOwned>(&self) -> ScimResult<T> {
        Ok(serde_json::from_value(Value::Object(self.0.clone()))?)
    }

    pub fn as_object(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn as_object_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    pub fn into_object(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Get a top-level attribute value.
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.0.get(attribute)
    }

    /// The resource id, when present and a string.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// The `meta` complex attribute, when present.
    pub fn meta(&self) -> Option<&Map<String, Value>> {
        self.0.get("meta").and_then(Value::as_object)
    }

    /// Update the `meta` complex attribute in place.
    ///
    /// `meta` is created when absent and replaced when it is not an object.
    pub fn update_meta<R>(&mut self, update: impl FnOnce(&mut Map<String, Value>) -> R) -> R {
        let slot = self.0.entry("meta").or_insert(Value::Null);
        let mut meta = match slot.take() {
            Value::Object(meta) => meta,
            _ => Map::new(),
        };
        let result = update(&mut meta);
        *slot = Value::Object(meta);
        result
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<Map<String, Value>> for GenericScimResource {
    fn from(object: Map<String, Value>) -> Self {
        Self(object)
    }
}

impl TryFrom<Value> for GenericScimResource {
    type Error = ScimError;

    fn try_from(value: Value) -> ScimResult<Self> {
        Self::from_value(value)
    }
}

impl From<GenericScimResource> for Value {
    fn from(resource: GenericScimResource) -> Self {
        resource.into_value()
    }
}
