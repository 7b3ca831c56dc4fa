//! Common test utilities for response shaping tests.
//!
//! Provides the standard resource types, RFC 7643 resource fixtures and a
//! logger that integrates with the test harness.

use scim_trim::resource::GenericScimResource;
use scim_trim::resource_type::{ResourceTypeDefinition, SimpleResourceTypeRegistry};
use scim_trim::schema::{AttributeDefinition, Returned, Schema, SchemaRegistry};
use serde_json::Value;
use std::sync::Arc;

pub mod fixtures;

/// Route `log` output through the test harness. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn schemas() -> SchemaRegistry {
    SchemaRegistry::new().expect("embedded schemas should load")
}

pub fn user_type() -> Arc<ResourceTypeDefinition> {
    Arc::new(ResourceTypeDefinition::user(&schemas()).expect("User resource type"))
}

pub fn group_type() -> Arc<ResourceTypeDefinition> {
    Arc::new(ResourceTypeDefinition::group(&schemas()).expect("Group resource type"))
}

/// A Group variant whose `members` are only returned when requested.
pub fn group_type_with_requested_members() -> Arc<ResourceTypeDefinition> {
    let mut core = schemas().get_group_schema().expect("Group schema").clone();
    for attribute in &mut core.attributes {
        if attribute.name == "members" {
            attribute.returned = Returned::Request;
        }
    }
    Arc::new(
        ResourceTypeDefinition::builder()
            .name("Group")
            .endpoint("/Groups")
            .core_schema(core)
            .build()
            .expect("Group resource type"),
    )
}

/// A minimal resource type with `userName` and a never-returned `password`.
pub fn account_type() -> Arc<ResourceTypeDefinition> {
    let schema = Schema {
        id: "urn:example:scim:schemas:Account".to_string(),
        name: "Account".to_string(),
        description: String::new(),
        attributes: vec![
            AttributeDefinition::new("userName"),
            AttributeDefinition::new("password").with_returned(Returned::Never),
        ],
    };
    Arc::new(
        ResourceTypeDefinition::builder()
            .name("Account")
            .endpoint("/Accounts")
            .core_schema(schema)
            .build()
            .expect("Account resource type"),
    )
}

pub fn standard_registry() -> SimpleResourceTypeRegistry {
    SimpleResourceTypeRegistry::with_standard_types(&schemas()).expect("standard resource types")
}

pub fn resource(value: Value) -> GenericScimResource {
    GenericScimResource::from_value(value).expect("resource must be a JSON object")
}
