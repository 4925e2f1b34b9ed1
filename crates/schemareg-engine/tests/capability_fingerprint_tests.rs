//! Capability Fingerprint Tests
//!
//! This test suite verifies module-set fingerprints and change notification.
//!
//! ## Scenarios Covered
//!
//! 1. Empty registry has the empty fingerprint
//! 2. Fingerprint is stable across rebuilds
//! 3. Feature selection narrows the capability
//! 4. Deviation modules are advertised on their target
//! 5. Listeners see every fingerprint change and nothing on failure
//! 6. Hello capabilities follow configuration

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::*;
use schemareg_core::ledger::EMPTY_MODULE_SET_ID;
use schemareg_core::model::ModuleId;
use schemareg_core::RegistryConfig;

#[test]
fn test_empty_registry_has_empty_fingerprint() {
    let (registry, _) = registry();
    assert_eq!(registry.get_module_set_id(), EMPTY_MODULE_SET_ID);
    assert!(registry.get_module_capabilities(false).is_empty());
}

#[test]
fn test_fingerprint_is_stable_across_rebuilds() {
    let (first, _) = router_registry();
    let (second, _) = router_registry();
    assert_eq!(first.get_module_set_id(), second.get_module_set_id());

    first
        .build_schema_context(vec![source("acme-router.yang")], None, None)
        .unwrap();
    assert_eq!(first.get_module_set_id(), second.get_module_set_id());
}

#[test]
fn test_feature_selection_narrows_the_capability() {
    let (registry, _) = router_registry();
    registry
        .load_schema_context("qos", vec![source("acme-qos.yang")], select(QOS_NS, &["shaping"]), no_deviations())
        .unwrap();

    let cap = registry
        .get_capability(&ModuleId::new("acme-qos", None))
        .unwrap();
    assert_eq!(cap, format!("{}?module=acme-qos&features=shaping", QOS_NS));
}

#[test]
fn test_deviation_module_is_advertised_on_its_target() {
    let (registry, _) = router_registry();
    registry
        .load_schema_context(
            "qos",
            vec![source("acme-qos.yang"), source("acme-qos-deviations.yang")],
            no_features(),
            no_deviations(),
        )
        .unwrap();

    let cap = registry
        .get_capability(&ModuleId::new("acme-qos", None))
        .unwrap();
    assert!(cap.ends_with("&deviations=acme-qos-deviations"), "{}", cap);
}

#[test]
fn test_listener_sees_every_fingerprint_change() {
    let (registry, _) = router_registry();
    let listener = Arc::new(RecordingListener::default());
    registry.add_module_set_listener(listener.clone());
    let initial = registry.get_module_set_id();

    registry
        .load_schema_context("qos", vec![source("acme-qos.yang")], no_features(), no_deviations())
        .unwrap();
    let loaded = registry.get_module_set_id();

    // impact registration does not change the module set
    registry.register_nodes_referenced_in_constraints(
        "qos",
        qos_path(&["qos", "policy", "name"]),
        qos_path(&["qos", "policy", "rate"]),
        schemareg_core::AccessExpression::new("x", schemareg_core::model::ReferenceKind::Must),
    );

    registry
        .unload_schema_context("qos", no_features(), no_deviations())
        .unwrap();

    let changes = listener.changes.lock().unwrap().clone();
    assert_eq!(
        changes,
        vec![(initial.clone(), loaded.clone()), (loaded, initial)]
    );
}

#[test]
fn test_failed_load_does_not_notify() {
    let (registry, _) = router_registry();
    let listener = Arc::new(RecordingListener::default());
    registry.add_module_set_listener(listener.clone());

    registry
        .load_schema_context("clash", vec![source("acme-clash.yang")], no_features(), no_deviations())
        .unwrap_err();

    assert!(listener.changes.lock().unwrap().is_empty());
}

#[test]
fn test_hello_capabilities_follow_configuration() {
    let (registry, _) = router_registry();
    registry
        .load_schema_context("tel", vec![source("acme-telemetry.yang")], no_features(), no_deviations())
        .unwrap();

    assert_eq!(registry.get_module_capabilities(false).len(), 2);
    let hello = registry.get_module_capabilities(true);
    assert_eq!(hello.len(), 1);
    assert!(hello[0].starts_with(ROUTER_NS));

    let config = RegistryConfig {
        hello_excludes_v1_1_modules: false,
        ..RegistryConfig::default()
    };
    let (inclusive, _) = registry_with(config);
    inclusive
        .build_schema_context(
            vec![source("acme-router.yang"), source("acme-telemetry.yang")],
            None,
            None,
        )
        .unwrap();
    assert_eq!(inclusive.get_module_capabilities(true).len(), 2);
}
