//! One published, internally consistent registry state
//!
//! Every part sits behind its own `Arc`. Copying a generation shares all
//! parts; a writer detaches only the part it changes via `Arc::make_mut`.

use std::sync::Arc;

use schemareg_core::augment::AugmentationRegistry;
use schemareg_core::impact::{ImpactGraph, ImpactMap, ReferringNode};
use schemareg_core::index::{IndexedChildren, SchemaIndex};
use schemareg_core::ledger::ComponentLedger;
use schemareg_core::validators::{TypeValidator, TypeValidatorCache};
use schemareg_core::{ModuleId, NodeRef, QName, Result, SchemaPath, VerificationError};

#[derive(Debug, Clone, Default)]
pub struct Generation {
    pub(crate) number: u64,
    pub(crate) index: Arc<SchemaIndex>,
    pub(crate) ledger: Arc<ComponentLedger>,
    pub(crate) impact: Arc<ImpactGraph>,
    pub(crate) augmentations: Arc<AugmentationRegistry>,
    pub(crate) validators: Arc<TypeValidatorCache>,
}

impl Generation {
    /// Copy sharing every part, numbered as the next generation
    pub(crate) fn successor(&self) -> Self {
        let mut next = self.clone();
        next.number += 1;
        next
    }

    /// Monotonic publish counter; 0 is the empty initial generation
    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn index(&self) -> &SchemaIndex {
        &self.index
    }

    pub fn ledger(&self) -> &ComponentLedger {
        &self.ledger
    }

    pub fn impact(&self) -> &ImpactGraph {
        &self.impact
    }

    pub fn augmentations(&self) -> &AugmentationRegistry {
        &self.augmentations
    }

    pub fn validators(&self) -> &TypeValidatorCache {
        &self.validators
    }

    // ---- schema queries ----

    pub fn get_data_schema_node(&self, path: &SchemaPath) -> Option<NodeRef> {
        self.index.get_data_schema_node(path)
    }

    pub fn get_children(&self, path: &SchemaPath) -> Vec<NodeRef> {
        self.index.get_children(path)
    }

    pub fn get_non_choice_children(&self, path: &SchemaPath) -> Vec<NodeRef> {
        self.index.get_non_choice_children(path)
    }

    /// # Errors
    ///
    /// `NodeNotFound` if `path` is not indexed.
    pub fn get_indexed_children(&self, path: &SchemaPath) -> Result<Arc<IndexedChildren>> {
        self.index.get_indexed_children(path).map(Arc::new)
    }

    /// # Errors
    ///
    /// `ParentNotFound` if `parent` is not indexed.
    pub fn child_schema_node(&self, parent: &SchemaPath, qname: &QName) -> Result<Option<NodeRef>> {
        self.index.child_schema_node(parent, qname)
    }

    pub fn get_descendant_schema_path(&self, ancestor: &SchemaPath, qname: &QName) -> Option<SchemaPath> {
        self.index.get_descendant_schema_path(ancestor, qname)
    }

    /// Every indexed path defined by the modules parsed from a component's
    /// sources; empty for unknown components
    pub fn schema_paths_for_component(&self, component_id: &str) -> Vec<SchemaPath> {
        let Some(entry) = self.ledger.component(component_id) else {
            return Vec::new();
        };
        let mut paths: Vec<SchemaPath> = self
            .index
            .modules()
            .filter(|m| entry.sources.iter().any(|s| s.name == m.source))
            .flat_map(|m| self.index.module_paths(&m.id()))
            .collect();
        paths.sort();
        paths
    }

    // ---- impact queries ----

    pub fn get_referenced_nodes_for_schema_paths(&self, path: &SchemaPath) -> ImpactMap {
        self.impact.referenced_nodes_for(path)
    }

    pub fn add_child_impact_paths(&self, changed: &SchemaPath) -> ImpactMap {
        self.impact.add_child_impact_paths(changed, &self.index)
    }

    pub fn referring_nodes(&self, referred: &SchemaPath) -> Vec<ReferringNode> {
        self.impact.referring_nodes(referred)
    }

    pub fn referring_nodes_under(&self, changed: &SchemaPath) -> Vec<ReferringNode> {
        self.impact.referring_nodes_under(changed)
    }

    pub fn must_referring_nodes(&self, component_id: &str) -> Vec<ReferringNode> {
        self.impact.must_referring_nodes(component_id)
    }

    pub fn when_referring_nodes(&self, component_id: &str) -> Vec<ReferringNode> {
        self.impact.when_referring_nodes(component_id)
    }

    /// Run the consistency checks against this generation
    pub fn verify(&self) -> Vec<VerificationError> {
        schemareg_core::rules::verify(&self.index, &self.impact)
    }

    // ---- capabilities ----

    pub fn get_module_capabilities(&self, for_hello: bool, exclude_v1_1: bool) -> Vec<String> {
        self.ledger.module_capabilities(for_hello, exclude_v1_1)
    }

    pub fn get_capability(&self, module: &ModuleId) -> Option<String> {
        self.ledger.capability(module).map(str::to_string)
    }

    pub fn get_module_set_id(&self) -> &str {
        self.ledger.module_set_id()
    }

    // ---- augmentation paths ----

    pub fn get_relative_path(&self, augmented_path: &str, schema_path: &SchemaPath) -> Option<String> {
        self.augmentations
            .get_relative_path(augmented_path, schema_path)
            .map(str::to_string)
    }

    pub fn get_matching_path(&self, data_path: &str) -> Option<String> {
        self.augmentations
            .get_matching_path(data_path)
            .map(str::to_string)
    }

    // ---- validators ----

    pub fn type_validator(&self, type_name: &QName) -> Option<Arc<dyn TypeValidator>> {
        self.validators.get(type_name)
    }
}
