//! Shared test utilities for scenepack-bundler integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use scenepack_bundler::{
    BuildOrchestrator, BuildResult, OrchestratorOptions, RolldownEngine, VendorMap,
};

/// A small vendor table covering the packages the fixtures import.
pub fn test_vendor() -> VendorMap {
    VendorMap::new([
        ("react", "vendor://react.js"),
        ("react-dom", "vendor://react-dom.js"),
        ("three", "vendor://three.js"),
        ("@react-three/fiber", "vendor://react-three-fiber.js"),
        ("@babylonjs/core", "vendor://babylonjs-core.js"),
    ])
    .expect("valid vendor table")
}

pub fn rolldown_orchestrator() -> BuildOrchestrator {
    BuildOrchestrator::new(
        Arc::new(RolldownEngine::new()),
        test_vendor(),
        OrchestratorOptions::default(),
    )
}

/// Assert the build succeeded and its bundle contains `substring`.
pub fn assert_bundle_contains(result: &BuildResult, substring: &str) {
    assert!(result.is_ok(), "expected a successful build, got errors: {:?}", result.errors);
    let code = result.bundle_code.as_deref().expect("successful builds carry code");
    assert!(
        code.contains(substring),
        "Expected bundle to contain '{}', but it didn't.\nBundle preview (first 500 chars): {}",
        substring,
        &code[..code.len().min(500)]
    );
}

/// Assert the build failed and some error mentions `needle`.
pub fn assert_error_mentions(result: &BuildResult, needle: &str) {
    assert!(!result.is_ok(), "expected a failed build");
    assert!(result.bundle_code.is_none());
    assert!(
        result.errors.iter().any(|error| error.contains(needle)),
        "Expected an error mentioning '{}', got: {:#?}",
        needle,
        result.errors
    );
}
