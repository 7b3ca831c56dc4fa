//! Responses for each kind of SCIM operation, through the response shaper.

use crate::common::{self, resource};
use scim_trim::{
    PatchOperation, PatchRequest, ResourcePreparer, ResponseShaper, ScimError, ScimServerConfig,
};
use serde_json::json;
use std::sync::Arc;

fn shaper() -> ResponseShaper {
    ResponseShaper::new(
        Arc::new(common::standard_registry()),
        ScimServerConfig::new("https://example.com"),
    )
}

fn requested_members_preparer() -> ResourcePreparer {
    ResourcePreparer::new(
        common::group_type_with_requested_members(),
        None,
        None,
        "https://example.com/v2/Groups",
    )
    .unwrap()
}

#[test]
fn test_retrieve_without_parameters_returns_all_but_never() {
    common::init_logging();
    let preparer = shaper().prepare("User", None, None).unwrap();

    let mut expected = common::fixtures::full_user();
    expected.as_object_mut().unwrap().remove("password");

    let response = preparer.trim_retrieved(&resource(common::fixtures::full_user()));
    assert_eq!(response.into_value(), expected);
}

#[test]
fn test_replace_returns_request_attributes_from_body() {
    common::init_logging();
    let preparer = requested_members_preparer();
    let stored = resource(common::fixtures::group());
    let request = resource(json!({
        "schemas": ["urn:ietf:params:scim:schemas:core:2.0:Group"],
        "displayName": "Tour Guides",
        "members": [{"value": "2819c223-7f76-453a-919d-413861904646"}]
    }));

    let response = preparer.trim_replaced(&stored, Some(&request));
    assert_eq!(response.into_value(), common::fixtures::group());
}

#[test]
fn test_modify_returns_attributes_targeted_by_patch_request() {
    common::init_logging();
    let preparer = requested_members_preparer();
    let stored = resource(common::fixtures::group());
    let patch = PatchRequest::from_value(json!({
        "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
        "Operations": [
            {"op": "remove", "path": "members[value eq \"902c246b-6245-4190-8e05-00816be7344a\"]"}
        ]
    }))
    .unwrap();

    let response = preparer.trim_modified(&stored, Some(patch.operations.as_slice()));
    assert_eq!(response.get("members").unwrap().as_array().unwrap().len(), 2);
}

#[test]
fn test_modify_with_pathless_operation_uses_value_attributes() {
    common::init_logging();
    let preparer = requested_members_preparer();
    let stored = resource(common::fixtures::group());

    let operations = [PatchOperation::add(None, json!({"displayName": "Guides"}))];
    let response = preparer.trim_modified(&stored, Some(operations.as_slice()));
    assert!(response.get("members").is_none());

    let operations = [PatchOperation::add(
        None,
        json!({"members": [{"value": "902c246b-6245-4190-8e05-00816be7344a"}]}),
    )];
    let response = preparer.trim_modified(&stored, Some(operations.as_slice()));
    assert!(response.get("members").is_some());
}

#[test]
fn test_query_attributes_apply_to_write_responses() {
    common::init_logging();
    let preparer = shaper().prepare("Group", Some("displayName"), None).unwrap();
    let stored = resource(common::fixtures::group());
    let request = resource(json!({"displayName": "Tour Guides", "members": []}));

    let response = preparer.trim_created(&stored, Some(&request));
    assert_eq!(
        response.into_value(),
        json!({
            "schemas": ["urn:ietf:params:scim:schemas:core:2.0:Group"],
            "id": "e9e30dba-f08f-4109-8486-d5c6a331660a",
            "displayName": "Tour Guides"
        })
    );
}

#[test]
fn test_meta_filled_before_trimming() {
    common::init_logging();
    let preparer = shaper().prepare("Users", None, Some("meta.created")).unwrap();
    let created = resource(json!({"id": "42", "userName": "alice", "meta": {"created": "2024-01-01T00:00:00Z"}}));

    let response = preparer.trim_created(&created, Some(&resource(json!({"userName": "alice"}))));
    assert_eq!(
        response.into_value(),
        json!({
            "id": "42",
            "userName": "alice",
            "meta": {
                "resourceType": "User",
                "location": "https://example.com/v2/Users/42"
            }
        })
    );
}

#[test]
fn test_invalid_parameters_are_client_errors() {
    common::init_logging();
    for (attributes, excluded) in [(Some("name.[x]"), None), (None, Some("urn:a:b:"))] {
        let error = shaper().prepare("User", attributes, excluded).unwrap_err();
        assert!(error.is_client_error(), "{} should be a client error", error);
        assert_eq!(error.scim_type(), Some("invalidValue"));
    }

    let error = shaper().prepare("Device", None, None).unwrap_err();
    assert!(matches!(error, ScimError::UnsupportedResourceType(_)));
}

#[test]
fn test_standard_group_members_returned_by_default() {
    common::init_logging();
    let preparer = ResourcePreparer::new(common::group_type(), None, None, "/Groups").unwrap();
    let stored = resource(common::fixtures::group());

    let response = preparer.trim_replaced(&stored, Some(&resource(json!({"displayName": "x"}))));
    assert_eq!(response.into_value(), common::fixtures::group());
}

#[test]
fn test_retrieve_and_create_responses_carry_meta() {
    common::init_logging();
    let preparer = shaper().prepare("User", None, None).unwrap();
    let stored = resource(json!({"id": "1", "userName": "bob"}));

    for response in [
        preparer.trim_retrieved(&stored),
        preparer.trim_created(&stored, Some(&resource(json!({"userName": "bob"})))),
    ] {
        let meta = response.meta().unwrap();
        assert_eq!(meta["resourceType"], "User");
        assert_eq!(meta["location"], "https://example.com/v2/Users/1");
    }
}
