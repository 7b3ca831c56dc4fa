//! Worked examples of attribute selection.

use crate::common::{self, resource};
use scim_trim::ResourcePreparer;
use serde_json::json;

fn stored_account() -> serde_json::Value {
    json!({"userName": "bob", "password": "x", "id": "1"})
}

#[test]
fn test_allow_list_keeps_requested_and_always_attributes() {
    common::init_logging();
    let preparer = ResourcePreparer::new(common::account_type(), Some("userName"), None, "/Accounts")
        .unwrap();

    let response = preparer.trim_retrieved(&resource(stored_account()));
    assert_eq!(response.into_value(), json!({"userName": "bob", "id": "1"}));
}

#[test]
fn test_deny_list_removes_listed_attribute() {
    common::init_logging();
    let preparer = ResourcePreparer::new(common::account_type(), None, Some("password"), "/Accounts")
        .unwrap();

    let response = preparer.trim_retrieved(&resource(stored_account()));
    assert_eq!(
        response.into_value(),
        json!({
            "userName": "bob",
            "id": "1",
            "meta": {"resourceType": "Account", "location": "/Accounts/1"}
        })
    );
}

#[test]
fn test_request_only_attribute_absent_from_write_is_suppressed() {
    common::init_logging();
    let preparer =
        ResourcePreparer::new(common::group_type_with_requested_members(), None, None, "/Groups")
            .unwrap();
    let stored = resource(common::fixtures::group());
    let request = resource(json!({"displayName": "Team A"}));

    let response = preparer.trim_created(&stored, Some(&request));
    assert!(response.get("members").is_none());
    assert_eq!(response.get("displayName"), Some(&json!("Tour Guides")));
    assert!(response.id().is_some());
}

#[test]
fn test_deny_list_child_keeps_parent_and_siblings() {
    common::init_logging();
    let preparer =
        ResourcePreparer::new(common::user_type(), None, Some("name.givenName"), "/Users").unwrap();

    let response = preparer.trim_retrieved(&resource(common::fixtures::full_user()));
    let name = response.get("name").unwrap();
    assert!(name.get("givenName").is_none());
    assert_eq!(name["familyName"], "Jensen");
    assert_eq!(name["formatted"], "Ms. Barbara J Jensen, III");
}

#[test]
fn test_allow_list_parent_implies_children() {
    common::init_logging();
    let preparer = ResourcePreparer::new(common::user_type(), Some("name"), None, "/Users").unwrap();

    let response = preparer.trim_retrieved(&resource(common::fixtures::full_user()));
    assert_eq!(
        response.get("name"),
        common::fixtures::full_user().get("name")
    );
    assert!(response.get("userName").is_none());
}

#[test]
fn test_allow_list_child_keeps_only_that_child() {
    common::init_logging();
    let preparer =
        ResourcePreparer::new(common::user_type(), Some("emails.value"), None, "/Users").unwrap();

    let response = preparer.trim_retrieved(&resource(common::fixtures::full_user()));
    assert_eq!(
        response.into_value(),
        json!({
            "id": "2819c223-7f76-453a-919d-413861904646",
            "schemas": [
                "urn:ietf:params:scim:schemas:core:2.0:User",
                "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User"
            ],
            "emails": [
                {"value": "bjensen@example.com"},
                {"value": "babs@jensen.org"}
            ]
        })
    );
}

#[test]
fn test_fully_suppressed_complex_attribute_leaves_no_key() {
    common::init_logging();
    let preparer = ResourcePreparer::new(
        common::user_type(),
        None,
        Some("meta.resourceType,meta.created,meta.lastModified,meta.version,meta.location"),
        "/Users",
    )
    .unwrap();

    let response = preparer.trim_retrieved(&resource(common::fixtures::full_user()));
    assert!(response.get("meta").is_none());
    assert!(response.get("name").is_some());
}

#[test]
fn test_password_never_returned() {
    common::init_logging();
    for (attributes, excluded) in [
        (Some("password"), None),
        (None, Some("userName")),
        (None, None),
    ] {
        let preparer =
            ResourcePreparer::new(common::user_type(), attributes, excluded, "/Users").unwrap();
        let response = preparer.trim_created(
            &resource(common::fixtures::full_user()),
            Some(&resource(json!({"password": "secret"}))),
        );
        assert!(response.get("password").is_none());
        assert!(response.id().is_some());
    }
}

#[test]
fn test_schema_qualified_and_filtered_query_paths() {
    common::init_logging();
    let preparer = ResourcePreparer::new(
        common::user_type(),
        Some(
            "urn:ietf:params:scim:schemas:core:2.0:User:userName, emails[type eq \"work\"].value",
        ),
        None,
        "/Users",
    )
    .unwrap();

    let response = preparer.trim_retrieved(&resource(common::fixtures::full_user()));
    assert_eq!(response.get("userName"), Some(&json!("bjensen@example.com")));
    // Value filters don't select individual values.
    assert_eq!(response.get("emails").unwrap().as_array().unwrap().len(), 2);
    assert!(response.get("displayName").is_none());
}
