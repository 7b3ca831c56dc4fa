//! Integration tests for SCIM response shaping.

pub mod examples;
pub mod extensions;
pub mod operations;
pub mod property_tests;
