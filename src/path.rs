//! Attribute paths for locating attributes within SCIM resources.
//!
//! A [`Path`] is an optional schema URN followed by a sequence of attribute
//! names, each optionally carrying a value filter:
//!
//! ```text
//! name.givenName
//! emails[type eq "work"].value
//! urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:manager.displayName
//! ```
//!
//! Attribute names and schema URNs compare case-insensitively, as required
//! by RFC 7643 Section 2.1. Paths are immutable values; every operation that
//! changes a path returns a new one.
//!
//! # Examples
//!
//! ```rust
//! use scim_trim::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let path: Path = "name.givenName".parse()?;
//! assert_eq!(path.size(), 2);
//! assert_eq!(path.sub_path(1)?, Path::root().attribute("NAME"));
//! # Ok(())
//! # }
//! ```

use crate::error::{PathError, PathResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Check whether a string looks like a schema URN.
pub fn is_urn(value: &str) -> bool {
    value.len() > 4 && has_urn_prefix(value)
}

fn has_urn_prefix(value: &str) -> bool {
    value
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("urn:"))
}

/// One attribute name within a path, with its optional value filter.
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    filter: Option<String>,
}

impl Element {
    /// The attribute name as written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value filter text between the brackets, if any.
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name) && self.filter == other.filter
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.to_ascii_lowercase().hash(state);
        self.filter.hash(state);
    }
}

/// A namespace-aware locator for an attribute or sub-attribute.
#[derive(Debug, Clone, Default)]
pub struct Path {
    schema_urn: Option<String>,
    elements: Vec<Element>,
}

impl Path {
    /// The empty path, addressing the resource itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// The empty path within a schema namespace.
    pub fn root_with_schema(schema_urn: impl Into<String>) -> Self {
        Self {
            schema_urn: Some(schema_urn.into()),
            elements: Vec::new(),
        }
    }

    pub(crate) fn from_parts(schema_urn: Option<String>, elements: Vec<Element>) -> Self {
        Self {
            schema_urn,
            elements,
        }
    }

    /// Parse a path from its SCIM string form.
    pub fn parse(text: &str) -> PathResult<Self> {
        if text.is_empty() {
            return Err(PathError::malformed(text, "path is empty"));
        }

        let (schema_urn, attributes) = if has_urn_prefix(text) {
            // The attribute name follows the last colon that is not part of a value filter.
            let search_end = text.find('[').unwrap_or(text.len());
            let colon = text[..search_end].rfind(':').unwrap_or(3);
            if colon <= 3 {
                return Err(PathError::malformed(text, "schema URN is incomplete"));
            }
            (Some(text[..colon].to_string()), &text[colon + 1..])
        } else {
            (None, text)
        };

        if attributes.is_empty() {
            return Err(PathError::malformed(
                text,
                "missing attribute name after schema URN",
            ));
        }

        let elements = parse_elements(text, attributes)?;
        Ok(Self {
            schema_urn,
            elements,
        })
    }

    /// Append an attribute name to this path.
    pub fn attribute(&self, name: impl Into<String>) -> Self {
        let mut elements = self.elements.clone();
        elements.push(Element {
            name: name.into(),
            filter: None,
        });
        Self {
            schema_urn: self.schema_urn.clone(),
            elements,
        }
    }

    /// The path of a document key found at this path.
    ///
    /// Top-level keys that are schema URNs hold extension attributes and open
    /// a new namespace instead of becoming an attribute name.
    pub fn field(&self, key: &str) -> Self {
        if self.is_root() && self.schema_urn.is_none() && is_urn(key) {
            Self::root_with_schema(key)
        } else {
            self.attribute(key)
        }
    }

    /// Number of attribute names in the path. The schema URN is not counted.
    pub fn size(&self) -> usize {
        self.elements.len()
    }

    /// Whether the path has no attribute names.
    pub fn is_root(&self) -> bool {
        self.elements.is_empty()
    }

    /// The schema URN namespace of the path, if any.
    pub fn schema_urn(&self) -> Option<&str> {
        self.schema_urn.as_deref()
    }

    /// The attribute names of the path.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// The first `size` attribute names of this path, in the same namespace.
    pub fn sub_path(&self, size: usize) -> PathResult<Self> {
        if size > self.elements.len() {
            return Err(PathError::IndexOutOfRange {
                index: size,
                size: self.elements.len(),
            });
        }
        Ok(self.truncated(size))
    }

    fn truncated(&self, size: usize) -> Self {
        Self {
            schema_urn: self.schema_urn.clone(),
            elements: self.elements[..size].to_vec(),
        }
    }

    /// Strict ancestors of this path, nearest first, ending with its root.
    pub fn ancestors(&self) -> impl Iterator<Item = Path> + '_ {
        (0..self.elements.len()).rev().map(|size| self.truncated(size))
    }

    /// Whether `other` lies strictly below this path.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        other.elements.len() > self.elements.len()
            && same_schema(self.schema_urn(), other.schema_urn())
            && other.elements[..self.elements.len()] == self.elements[..]
    }

    /// The same path with every value filter removed.
    pub fn without_filters(&self) -> Self {
        Self {
            schema_urn: self.schema_urn.clone(),
            elements: self
                .elements
                .iter()
                .map(|element| Element {
                    name: element.name.clone(),
                    filter: None,
                })
                .collect(),
        }
    }

    /// The same attribute names without a schema namespace.
    pub fn without_schema_urn(&self) -> Self {
        Self {
            schema_urn: None,
            elements: self.elements.clone(),
        }
    }
}

fn same_schema(left: Option<&str>, right: Option<&str>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(left), Some(right)) => left.eq_ignore_ascii_case(right),
        _ => false,
    }
}

fn parse_elements(text: &str, attributes: &str) -> PathResult<Vec<Element>> {
    let mut elements = Vec::new();
    let mut rest = attributes;

    loop {
        let end = rest
            .find(['.', '[', ']'])
            .unwrap_or(rest.len());
        let name = &rest[..end];
        validate_name(text, name)?;
        rest = &rest[end..];

        let mut filter = None;
        if rest.starts_with(']') {
            return Err(PathError::malformed(text, "unexpected ']'"));
        }
        if let Some(after_open) = rest.strip_prefix('[') {
            let close = find_closing_bracket(after_open)
                .ok_or_else(|| PathError::malformed(text, "unterminated value filter"))?;
            let body = after_open[..close].trim();
            if body.is_empty() {
                return Err(PathError::malformed(text, "empty value filter"));
            }
            filter = Some(body.to_string());
            rest = &after_open[close + 1..];
        }

        elements.push(Element {
            name: name.to_string(),
            filter,
        });

        if rest.is_empty() {
            return Ok(elements);
        }
        rest = rest.strip_prefix('.').ok_or_else(|| {
            PathError::malformed(text, "expected '.' after value filter")
        })?;
    }
}

fn validate_name(text: &str, name: &str) -> PathResult<()> {
    if name.is_empty() {
        return Err(PathError::malformed(text, "empty attribute name"));
    }
    if let Some(invalid) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '$')))
    {
        return Err(PathError::malformed(
            text,
            format!("invalid character '{invalid}' in attribute name '{name}'"),
        ));
    }
    Ok(())
}

/// Byte offset of the `]` closing a value filter, skipping quoted strings.
fn find_closing_bracket(filter: &str) -> Option<usize> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (index, c) in filter.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ']' if !in_quotes => return Some(index),
            _ => {}
        }
    }
    None
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        same_schema(self.schema_urn(), other.schema_urn()) && self.elements == other.elements
    }
}

impl Eq for Path {}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.schema_urn
            .as_ref()
            .map(|urn| urn.to_ascii_lowercase())
            .hash(state);
        self.elements.hash(state);
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(urn) = &self.schema_urn {
            write!(f, "{}", urn)?;
            if !self.elements.is_empty() {
                write!(f, ":")?;
            }
        }
        for (index, element) in self.elements.iter().enumerate() {
            if index > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", element.name)?;
            if let Some(filter) = &element.filter {
                write!(f, "[{}]", filter)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(value: &str) -> PathResult<Self> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for Path {
    type Error = PathError;

    fn try_from(value: &str) -> PathResult<Self> {
        Self::parse(value)
    }
}

impl Serialize for Path {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}
