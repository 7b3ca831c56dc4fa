//! Schema extension attributes in responses.

use crate::common::{self, resource};
use scim_trim::ResourcePreparer;
use scim_trim::schema::ENTERPRISE_USER_SCHEMA;
use serde_json::json;

fn user_preparer(attributes: Option<&str>, excluded: Option<&str>) -> ResourcePreparer {
    ResourcePreparer::new(common::user_type(), attributes, excluded, "/Users").unwrap()
}

#[test]
fn test_select_extension_attribute() {
    common::init_logging();
    let attributes = format!("{}:manager.displayName", ENTERPRISE_USER_SCHEMA);
    let preparer = user_preparer(Some(attributes.as_str()), None);

    let response = preparer.trim_retrieved(&resource(common::fixtures::full_user()));
    assert_eq!(
        response.get(ENTERPRISE_USER_SCHEMA),
        Some(&json!({"manager": {"displayName": "John Smith"}}))
    );
    assert!(response.get("userName").is_none());
}

#[test]
fn test_select_whole_extension() {
    common::init_logging();
    let preparer = user_preparer(Some(ENTERPRISE_USER_SCHEMA), None);

    let response = preparer.trim_retrieved(&resource(common::fixtures::full_user()));
    assert_eq!(
        response.get(ENTERPRISE_USER_SCHEMA),
        common::fixtures::full_user().get(ENTERPRISE_USER_SCHEMA)
    );
    assert!(response.get("name").is_none());
}

#[test]
fn test_exclude_whole_extension() {
    common::init_logging();
    let preparer = user_preparer(None, Some(ENTERPRISE_USER_SCHEMA));

    let response = preparer.trim_retrieved(&resource(common::fixtures::full_user()));
    assert!(response.get(ENTERPRISE_USER_SCHEMA).is_none());
    assert!(response.get("name").is_some());
}

#[test]
fn test_exclude_extension_attribute_keeps_others() {
    common::init_logging();
    let preparer = user_preparer(
        None,
        Some(format!("{0}:manager,{0}:costCenter", ENTERPRISE_USER_SCHEMA).as_str()),
    );

    let response = preparer.trim_retrieved(&resource(common::fixtures::full_user()));
    let extension = response.get(ENTERPRISE_USER_SCHEMA).unwrap();
    assert!(extension.get("manager").is_none());
    assert!(extension.get("costCenter").is_none());
    assert_eq!(extension["employeeNumber"], "701984");
}

#[test]
fn test_core_schema_reference_selects_core_attributes() {
    common::init_logging();
    // The core schema URN alone normalizes to the resource root.
    let preparer = user_preparer(Some("urn:ietf:params:scim:schemas:core:2.0:User"), None);

    let response = preparer.trim_retrieved(&resource(common::fixtures::full_user()));
    assert!(response.get("userName").is_some());
    assert!(response.get("name").is_some());
    assert!(response.get("password").is_none());
    assert!(response.get(ENTERPRISE_USER_SCHEMA).is_none());
}

#[test]
fn test_unqualified_name_does_not_reach_extension() {
    common::init_logging();
    let preparer = user_preparer(Some("employeeNumber"), None);

    let response = preparer.trim_retrieved(&resource(common::fixtures::full_user()));
    assert!(response.get(ENTERPRISE_USER_SCHEMA).is_none());
}

#[test]
fn test_extension_attributes_collected_from_request() {
    common::init_logging();
    let mut extension = common::schemas()
        .get_enterprise_user_schema()
        .unwrap()
        .clone();
    for attribute in &mut extension.attributes {
        if attribute.name == "costCenter" {
            attribute.returned = scim_trim::Returned::Request;
        }
    }
    let definition = scim_trim::ResourceTypeDefinition::builder()
        .name("User")
        .endpoint("/Users")
        .core_schema(common::schemas().get_user_schema().unwrap().clone())
        .schema_extension(extension, false)
        .build()
        .unwrap();
    let preparer =
        ResourcePreparer::new(std::sync::Arc::new(definition), None, None, "/Users").unwrap();
    let stored = resource(common::fixtures::full_user());

    let response = preparer.trim_retrieved(&stored);
    assert!(response.get(ENTERPRISE_USER_SCHEMA).unwrap().get("costCenter").is_none());

    let request = resource(json!({ENTERPRISE_USER_SCHEMA: {"costCenter": "4130"}}));
    let response = preparer.trim_replaced(&stored, Some(&request));
    assert_eq!(response.get(ENTERPRISE_USER_SCHEMA).unwrap()["costCenter"], "4130");
}
