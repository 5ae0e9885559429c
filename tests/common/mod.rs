//! Common test utilities, fixtures, and mocks shared across test files.

// Each test binary uses its own subset of these helpers.
#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize tracing for tests; safe to call from every test.
pub fn init() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .init();
    });
}
