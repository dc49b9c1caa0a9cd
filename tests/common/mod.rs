//! Common test utilities for integration tests

#![allow(dead_code)]

use popthings::ScriptedValues;
use std::path::PathBuf;

/// Path to a file under tests/fixtures
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// The packing-list template
pub fn packing_list() -> String {
    std::fs::read_to_string(fixture_path("packing_list.taskpaper")).unwrap()
}

/// Values for the packing-list placeholders
pub fn packing_values() -> ScriptedValues {
    ScriptedValues::new([
        ("start", "2018-09-01"),
        ("due", "2018-09-10"),
        ("destination", "Paris"),
    ])
}
