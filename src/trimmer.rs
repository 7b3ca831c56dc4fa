//! Resource trimming.
//!
//! [`ResourceTrimmer`] copies a resource tree, keeping only the attributes a
//! `should_return` predicate approves and dropping containers left empty.
//! [`ScimResourceTrimmer`] is the predicate SCIM prescribes: it combines the
//! schema's `returned` characteristic, the request attributes and the
//! `attributes`/`excludedAttributes` query parameters.
//!
//! # Examples
//!
//! ```rust
//! use scim_trim::path::Path;
//! use scim_trim::trimmer::ResourceTrimmer;
//! use serde_json::json;
//!
//! let drop_secrets = |path: &Path| path.to_string() != "secret";
//! let resource = json!({"name": "x", "secret": "s"});
//! let trimmed = drop_secrets.trim_object(resource.as_object().unwrap());
//! assert_eq!(serde_json::Value::Object(trimmed), json!({"name": "x"}));
//! ```

use crate::path::Path;
use crate::resource_type::ResourceTypeDefinition;
use crate::schema::Returned;
use crate::selector::AttributeSelector;

use log::trace;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Trims resources down to selected attributes.
///
/// Implementors decide per attribute path; the provided methods walk the
/// tree. Arrays don't add a path segment: every element of a multi-valued
/// attribute is trimmed at the attribute's path. Rejecting a path drops its
/// whole subtree without consulting the predicate for its descendants.
pub trait ResourceTrimmer {
    /// Determine if the attribute specified by the path should be returned.
    fn should_return(&self, path: &Path) -> bool;

    /// Trim the attributes of a resource.
    fn trim_object(&self, object: &Map<String, Value>) -> Map<String, Value> {
        self.trim_object_at(object, &Path::root())
    }

    /// Trim the attributes of an object found at `parent`.
    fn trim_object_at(&self, object: &Map<String, Value>, parent: &Path) -> Map<String, Value> {
        let mut trimmed = Map::new();
        for (key, value) in object {
            let path = parent.field(key);
            if !path.is_root() && !self.should_return(&path) {
                continue;
            }

            match value {
                Value::Object(inner) => {
                    let inner = self.trim_object_at(inner, &path);
                    if !inner.is_empty() {
                        trimmed.insert(key.clone(), Value::Object(inner));
                    }
                }
                Value::Array(items) => {
                    let items = self.trim_array_at(items, &path);
                    if !items.is_empty() {
                        trimmed.insert(key.clone(), Value::Array(items));
                    }
                }
                scalar => {
                    trimmed.insert(key.clone(), scalar.clone());
                }
            }
        }
        trimmed
    }

    /// Trim the values of an array found at `parent`.
    fn trim_array_at(&self, items: &[Value], parent: &Path) -> Vec<Value> {
        let mut trimmed = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::Object(inner) => {
                    let inner = self.trim_object_at(inner, parent);
                    if !inner.is_empty() {
                        trimmed.push(Value::Object(inner));
                    }
                }
                Value::Array(nested) => {
                    let nested = self.trim_array_at(nested, parent);
                    if !nested.is_empty() {
                        trimmed.push(Value::Array(nested));
                    }
                }
                scalar => trimmed.push(scalar.clone()),
            }
        }
        trimmed
    }
}

impl<F> ResourceTrimmer for F
where
    F: Fn(&Path) -> bool,
{
    fn should_return(&self, path: &Path) -> bool {
        self(path)
    }
}

/// A resource trimmer implementing the SCIM rules for returning attributes.
#[derive(Debug, Clone, Copy)]
pub struct ScimResourceTrimmer<'a> {
    resource_type: &'a ResourceTypeDefinition,
    request_attributes: &'a HashSet<Path>,
    query_attributes: &'a HashSet<Path>,
    excluded: bool,
}

impl<'a> ScimResourceTrimmer<'a> {
    /// Create a trimmer.
    ///
    /// * `request_attributes` - attributes in the request body or patch
    ///   operations; empty for other requests
    /// * `query_attributes` - paths from `attributes` or `excludedAttributes`
    /// * `excluded` - whether `query_attributes` came from `excludedAttributes`
    pub fn new(
        resource_type: &'a ResourceTypeDefinition,
        request_attributes: &'a HashSet<Path>,
        query_attributes: &'a HashSet<Path>,
        excluded: bool,
    ) -> Self {
        Self {
            resource_type,
            request_attributes,
            query_attributes,
            excluded,
        }
    }

    /// Create a trimmer from a complete attribute selection.
    pub fn from_selector(
        resource_type: &'a ResourceTypeDefinition,
        selector: &'a AttributeSelector,
    ) -> Self {
        Self::new(
            resource_type,
            selector.request_attributes(),
            selector.query_attributes(),
            selector.is_excluded(),
        )
    }

    /// Whether `path` is listed in `paths`, directly, through an ancestor,
    /// or (for allow-lists only) through a listed descendant.
    fn path_contains(&self, paths: &HashSet<Path>, path: &Path) -> bool {
        if paths.contains(path) {
            return true;
        }

        // Including name.givenName keeps the enclosing name.
        if !self.excluded && paths.iter().any(|listed| path.is_ancestor_of(listed)) {
            return true;
        }

        // Listing name covers name.{anything}.
        path.ancestors().any(|ancestor| paths.contains(&ancestor))
    }
}

impl ResourceTrimmer for ScimResourceTrimmer<'_> {
    fn should_return(&self, path: &Path) -> bool {
        let returned = self.resource_type.returned(path);
        let decision = match returned {
            Returned::Always => true,
            Returned::Never => false,
            Returned::Request => {
                self.path_contains(self.request_attributes, path)
                    || (self.request_attributes.is_empty()
                        && !self.excluded
                        && self.path_contains(self.query_attributes, path))
            }
            Returned::Default => {
                if self.excluded {
                    !self.path_contains(self.query_attributes, path)
                } else {
                    self.query_attributes.is_empty()
                        || self.path_contains(self.query_attributes, path)
                }
            }
        };
        if !decision {
            trace!("Suppressing '{}' (returned: {:?})", path, returned);
        }
        decision
    }
}
