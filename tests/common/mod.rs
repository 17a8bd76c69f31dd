//! Common test utilities for integration tests
//!
//! Shared fingerprint fixtures and trace-file helpers.

#![allow(dead_code)]

use ctxprof::ConfigurationFingerprint;
use std::io::Write;
use tempfile::NamedTempFile;

/// Three-class web fingerprint with the `test` profile.
pub fn web() -> ConfigurationFingerprint {
    ConfigurationFingerprint::new(["app.DataConfig", "app.WebConfig", "app.SecurityConfig"])
        .with_profiles(["test"])
}

/// Same classes as [`web`] with an extra profile.
pub fn web_integration() -> ConfigurationFingerprint {
    ConfigurationFingerprint::new(["app.DataConfig", "app.WebConfig", "app.SecurityConfig"])
        .with_profiles(["test", "integration"])
}

/// Shares nothing with the web fingerprints.
pub fn batch() -> ConfigurationFingerprint {
    ConfigurationFingerprint::new(["app.BatchConfig"]).with_profiles(["batch"])
}

/// A fingerprint unique to `i` that scores 0 against every other index.
pub fn distinct(i: usize) -> ConfigurationFingerprint {
    ConfigurationFingerprint::new([format!("app.Config{i}")]).with_profiles([format!("p{i}")])
}

/// Shares `app.SharedConfig` and the `test` profile with every other index,
/// plus one class unique to `i`.
pub fn overlapping(i: usize) -> ConfigurationFingerprint {
    ConfigurationFingerprint::new(["app.SharedConfig".to_string(), format!("app.Config{i}")])
        .with_profiles(["test"])
}

/// Writes `content` to a temp file with the given suffix (".yaml", ".json").
pub fn write_trace(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp trace");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp trace");
    file.flush().expect("Failed to flush temp trace");
    file
}

/// A small suite: two web tests sharing one environment, an integration
/// test with a near-duplicate environment and an unrelated batch job.
pub const SUITE_TRACE: &str = r"
fingerprints:
  web:
    wiring_classes: [app.DataConfig, app.WebConfig, app.SecurityConfig]
    active_profiles: [test]
  web_it:
    wiring_classes: [app.DataConfig, app.WebConfig, app.SecurityConfig]
    active_profiles: [test, integration]
  batch:
    wiring_classes: [app.BatchConfig]
    active_profiles: [batch]
events:
  - event: load
    fingerprint: web
    test_unit: com.acme.OrderControllerTest
    load_ms: 2500
    at: 2025-03-01T12:00:00Z
  - event: method
    fingerprint: web
    test_unit: com.acme.OrderControllerTest
    method: createsOrder
  - event: size_proxy
    fingerprint: web
    units: [orderController, orderService, orderRepository]
  - event: load
    fingerprint: web
    test_unit: com.acme.CustomerControllerTest
    load_ms: 0
    at: 2025-03-01T12:00:03Z
  - event: load
    fingerprint: web_it
    test_unit: com.acme.CheckoutIT
    load_ms: 1800
    at: 2025-03-01T12:00:05Z
  - event: register
    fingerprint: batch
    test_unit: com.acme.NightlyJobTest
  - event: created
    fingerprint: batch
    load_ms: 400
    available_parallelism: 8
    at: 2025-03-01T12:00:09Z
";
