//! Property-based tests for the visibility rules.
//!
//! Resources, request attribute sets and query attribute sets are drawn from
//! a small vocabulary of attribute names so that generated paths regularly
//! hit the `always`, `never` and `request` attributes of the test schema.

use proptest::prelude::*;
use scim_trim::path::Path;
use scim_trim::resource_type::ResourceTypeDefinition;
use scim_trim::schema::{AttributeDefinition, Returned, Schema};
use scim_trim::trimmer::{ResourceTrimmer, ScimResourceTrimmer};
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::sync::OnceLock;

const NAMES: &[&str] = &["label", "serial", "secret", "audit", "size", "width", "height", "other"];

/// Top-level attributes cover every returned characteristic; `size` nests them again.
fn widget_type() -> &'static ResourceTypeDefinition {
    static WIDGET: OnceLock<ResourceTypeDefinition> = OnceLock::new();
    WIDGET.get_or_init(|| {
        let nested = || {
            vec![
                AttributeDefinition::new("width"),
                AttributeDefinition::new("height"),
                AttributeDefinition::new("serial").with_returned(Returned::Always),
                AttributeDefinition::new("secret").with_returned(Returned::Never),
                AttributeDefinition::new("audit").with_returned(Returned::Request),
            ]
        };
        let schema = Schema {
            id: "urn:example:scim:schemas:Widget".to_string(),
            name: "Widget".to_string(),
            description: String::new(),
            attributes: vec![
                AttributeDefinition::new("label"),
                AttributeDefinition::new("serial").with_returned(Returned::Always),
                AttributeDefinition::new("secret").with_returned(Returned::Never),
                AttributeDefinition::new("audit").with_returned(Returned::Request),
                AttributeDefinition::complex("size", nested()).multi_valued(),
            ],
        };
        ResourceTypeDefinition::builder()
            .name("Widget")
            .endpoint("/Widgets")
            .core_schema(schema)
            .build()
            .expect("widget resource type")
    })
}

fn name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(NAMES).prop_map(str::to_string)
}

fn path_strategy() -> impl Strategy<Value = Path> {
    prop::collection::vec(name_strategy(), 1..=3).prop_map(|names| {
        names
            .into_iter()
            .fold(Path::root(), |path, name| path.attribute(name))
    })
}

fn path_set_strategy() -> impl Strategy<Value = HashSet<Path>> {
    prop::collection::hash_set(path_strategy(), 0..4)
}

fn json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z]{0,6}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Array),
            prop::collection::btree_map(name_strategy(), inner, 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn object_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map(name_strategy(), json_strategy(), 0..6)
        .prop_map(|entries| entries.into_iter().collect())
}

fn returned_paths(returned: Returned) -> Vec<Path> {
    widget_type()
        .attribute_index()
        .iter()
        .filter(|(_, definition)| definition.returned == returned)
        .map(|(path, _)| path.clone())
        .collect()
}

proptest! {
    #[test]
    fn test_never_attributes_are_never_returned(
        request in path_set_strategy(),
        query in path_set_strategy(),
        excluded in any::<bool>(),
    ) {
        let trimmer = ScimResourceTrimmer::new(widget_type(), &request, &query, excluded);
        for path in returned_paths(Returned::Never) {
            prop_assert!(!trimmer.should_return(&path), "{} was returned", path);
        }
    }

    #[test]
    fn test_always_attributes_are_always_returned(
        request in path_set_strategy(),
        query in path_set_strategy(),
        excluded in any::<bool>(),
    ) {
        let trimmer = ScimResourceTrimmer::new(widget_type(), &request, &query, excluded);
        for path in returned_paths(Returned::Always) {
            prop_assert!(trimmer.should_return(&path), "{} was suppressed", path);
        }
    }

    #[test]
    fn test_trimming_is_idempotent(
        resource in object_strategy(),
        request in path_set_strategy(),
        query in path_set_strategy(),
        excluded in any::<bool>(),
    ) {
        let trimmer = ScimResourceTrimmer::new(widget_type(), &request, &query, excluded);
        let once = trimmer.trim_object(&resource);
        let twice = trimmer.trim_object(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_allow_list_covers_descendants(
        listed in path_strategy(),
        suffix in prop::collection::vec(name_strategy(), 1..=2),
    ) {
        let descendant = suffix
            .into_iter()
            .fold(listed.clone(), |path, name| path.attribute(name));
        let returned = widget_type().returned(&descendant);
        prop_assume!(matches!(returned, Returned::Default | Returned::Request));

        let request = HashSet::new();
        let query = HashSet::from([listed]);
        let trimmer = ScimResourceTrimmer::new(widget_type(), &request, &query, false);
        prop_assert!(trimmer.should_return(&descendant));
    }

    #[test]
    fn test_trimmed_output_has_no_empty_containers(
        resource in object_strategy(),
        query in path_set_strategy(),
        excluded in any::<bool>(),
    ) {
        let request = HashSet::new();
        let trimmer = ScimResourceTrimmer::new(widget_type(), &request, &query, excluded);
        let trimmed = Value::Object(trimmer.trim_object(&resource));
        prop_assert!(!has_empty_container_below_root(&trimmed));
    }
}

fn has_empty_container_below_root(value: &Value) -> bool {
    let children: Vec<&Value> = match value {
        Value::Object(object) => object.values().collect(),
        Value::Array(items) => items.iter().collect(),
        _ => return false,
    };
    children.into_iter().any(|child| {
        let empty = match child {
            Value::Object(object) => object.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        };
        empty || has_empty_container_below_root(child)
    })
}
