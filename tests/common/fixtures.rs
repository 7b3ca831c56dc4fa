//! Test fixtures for loading resource documents.
//!
//! Fixtures live under `tests/fixtures/` and are cached after the first load.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Cache for loaded fixtures to avoid repeated file I/O
static FIXTURE_CACHE: OnceLock<Mutex<HashMap<String, Value>>> = OnceLock::new();

/// Load a fixture from the fixtures directory with caching
pub fn load_fixture(path: &str) -> Value {
    let cache = FIXTURE_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock().expect("fixture cache poisoned");

    if let Some(cached) = cache.get(path) {
        return cached.clone();
    }

    let fixture_path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), path);
    let content = std::fs::read_to_string(&fixture_path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", fixture_path));
    let value: Value = serde_json::from_str(&content)
        .unwrap_or_else(|_| panic!("Failed to parse JSON fixture: {}", fixture_path));

    cache.insert(path.to_string(), value.clone());
    value
}

/// RFC 7643 Section 8.3 Enterprise User, with a stored password.
pub fn full_user() -> Value {
    load_fixture("resources/user_full.json")
}

/// RFC 7643 Section 8.4 Group.
pub fn group() -> Value {
    load_fixture("resources/group.json")
}
