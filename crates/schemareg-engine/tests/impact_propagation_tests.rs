//! Impact Propagation Tests
//!
//! This test suite verifies impact registration and propagation through the registry.
//!
//! ## Scenarios Covered
//!
//! 1. Registered edges are queryable from both sides
//! 2. A change under a container reaches the referring node
//! 3. Kind-filtered indices per component
//! 4. Circular leaf-references are reported and block recomposition
//! 5. Constraints naming a node under a changed path are always reported

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::*;
use proptest::prelude::*;
use schemareg_core::model::{AccessExpression, ReferenceKind};
use schemareg_core::{SchemaError, VerificationError};

fn leafref(text: &str) -> AccessExpression {
    AccessExpression::new(text, ReferenceKind::LeafRef)
}

fn must(text: &str) -> AccessExpression {
    AccessExpression::new(text, ReferenceKind::Must)
}

#[test]
fn test_registered_edge_is_queryable_from_both_sides() {
    let (registry, _) = router_registry();
    let name = router_path(&["interfaces", "interface", "name"]);
    let default_if = router_path(&["routing", "default-interface"]);
    let expr = leafref("../../interfaces/interface/name");

    registry.register_nodes_referenced_in_constraints("router", name.clone(), default_if.clone(), expr.clone());

    let referenced = registry.get_referenced_nodes_for_schema_paths(&default_if);
    assert!(referenced[&name.without_revisions()].contains(&expr));

    let referring = registry.referring_nodes(&name);
    assert_eq!(referring.len(), 1);
    assert_eq!(referring[0].referring, default_if.without_revisions());
}

#[test]
fn test_change_under_container_reaches_referring_node() {
    let (registry, _) = router_registry();
    let mtu = router_path(&["interfaces", "interface", "mtu"]);
    let default_if = router_path(&["routing", "default-interface"]);
    registry.register_nodes_referenced_in_constraints("router", mtu.clone(), default_if.clone(), must("mtu > 0"));

    let hits = registry.referring_nodes_under(&router_path(&["interfaces"]));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].referring, default_if.without_revisions());
    assert!(hits[0].referred_under_changed);

    // the referring side surfaces when its own ancestor changes
    let below_routing = registry.add_child_impact_paths(&router_path(&["routing"]));
    assert!(below_routing.contains_key(&mtu.without_revisions()));
}

#[test]
fn test_kind_filtered_indices_per_component() {
    let (registry, _) = router_registry();
    let mtu = router_path(&["interfaces", "interface", "mtu"]);
    let name = router_path(&["interfaces", "interface", "name"]);
    registry.register_nodes_referenced_in_constraints("router", mtu.clone(), name.clone(), must("m"));
    registry.register_nodes_referenced_in_constraints(
        "router",
        name,
        mtu,
        AccessExpression::new("w", ReferenceKind::When),
    );

    assert_eq!(registry.must_referring_nodes("router").len(), 1);
    assert_eq!(registry.when_referring_nodes("router").len(), 1);
    assert_eq!(registry.deregister_nodes_referenced_in_constraints("router"), 2);
    assert!(registry.snapshot().impact().is_empty());
}

#[test]
fn test_circular_leafref_is_reported_and_blocks_recomposition() {
    let (registry, _) = router_registry();
    let name = router_path(&["interfaces", "interface", "name"]);
    let default_if = router_path(&["routing", "default-interface"]);

    registry.register_nodes_referenced_in_constraints(
        "router",
        name.clone(),
        default_if.clone(),
        leafref("../../interfaces/interface/name"),
    );
    assert!(registry.verify().is_empty());

    registry.register_nodes_referenced_in_constraints(
        "router",
        default_if.clone(),
        name.clone(),
        must("/acme:routing/acme:default-interface != ''"),
    );
    assert_eq!(
        registry.verify(),
        vec![VerificationError::CircularDependency {
            leaf: default_if,
            via: name,
        }]
    );

    let err = registry
        .load_schema_context("qos", vec![source("acme-qos.yang")], no_features(), no_deviations())
        .unwrap_err();
    assert!(matches!(err, SchemaError::Verification { .. }));

    registry.deregister_nodes_referenced_in_constraints("router");
    assert!(registry.verify().is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// A constraint on `referring` naming a node under `changed` is always
    /// reported for `changed`
    #[test]
    fn prop_referenced_descendant_reaches_referring(
        referenced in 0usize..4,
        changed in 0usize..2,
    ) {
        let candidates = [
            router_path(&["interfaces", "interface", "name"]),
            router_path(&["interfaces", "interface", "mtu"]),
            router_path(&["interfaces", "interface"]),
            router_path(&["interfaces"]),
        ];
        let ancestors = [router_path(&["interfaces"]), router_path(&["interfaces", "interface"])];
        let (registry, _) = router_registry();
        let referring = router_path(&["routing", "default-interface"]);
        let reported = referring.without_revisions();
        let referenced = candidates[referenced].clone();
        let changed = ancestors[changed].clone();

        registry.register_nodes_referenced_in_constraints("router", referenced.clone(), referring.clone(), must("x"));

        let hits = registry.referring_nodes_under(&changed);
        let covered = referenced == changed || changed.is_ancestor_of(&referenced);
        prop_assert_eq!(hits.iter().any(|h| h.referring == reported), covered);
    }
}
