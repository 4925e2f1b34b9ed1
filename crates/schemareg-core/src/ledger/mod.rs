//! Component Ledger
//!
//! Tracks the base source set and every dynamically loaded component in
//! load order, with the features and deviations each one activates. After
//! every composition the per-module supported sets, capability strings and
//! the module-set id are recomputed from the freshly built index.

pub mod capability;

use std::collections::{BTreeMap, BTreeSet};

pub use capability::{capability_string, module_set_id, EMPTY_MODULE_SET_ID};

use crate::errors::{Result, SchemaError};
use crate::index::SchemaIndex;
use crate::model::{LanguageVersion, Module, ModuleId, SchemaSource};

/// Namespace to the feature names activated for the module in it
pub type FeatureSelection = BTreeMap<String, BTreeSet<String>>;

/// Namespace to the names of the deviation modules applied to it
pub type DeviationSelection = BTreeMap<String, BTreeSet<String>>;

/// One loaded component
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentEntry {
    pub id: String,
    pub sources: Vec<SchemaSource>,
    pub features: FeatureSelection,
    pub deviations: DeviationSelection,
}

/// Capability of one module in the composed set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    pub module: ModuleId,
    pub language_version: LanguageVersion,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentLedger {
    base_sources: Vec<SchemaSource>,
    base_features: Option<FeatureSelection>,
    base_deviations: Option<DeviationSelection>,
    components: Vec<ComponentEntry>,
    supported_features: BTreeMap<ModuleId, BTreeSet<String>>,
    supported_deviations: BTreeMap<ModuleId, BTreeSet<String>>,
    capabilities: BTreeMap<ModuleId, Capability>,
    module_set_id: String,
}

impl Default for ComponentLedger {
    fn default() -> Self {
        Self {
            base_sources: Vec::new(),
            base_features: None,
            base_deviations: None,
            components: Vec::new(),
            supported_features: BTreeMap::new(),
            supported_deviations: BTreeMap::new(),
            capabilities: BTreeMap::new(),
            module_set_id: EMPTY_MODULE_SET_ID.to_string(),
        }
    }
}

impl ComponentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the base source set; loaded components are kept
    ///
    /// `None` selections leave every declared feature or deviation active.
    pub fn set_base(
        &mut self,
        sources: Vec<SchemaSource>,
        features: Option<FeatureSelection>,
        deviations: Option<DeviationSelection>,
    ) {
        self.base_sources = sources;
        self.base_features = features;
        self.base_deviations = deviations;
    }

    /// Record a component
    ///
    /// # Errors
    ///
    /// * `MissingSupportedFeatures` - `features` or `deviations` is `None`
    /// * `DuplicateComponent` - a component with this id is already recorded;
    ///   the ledger is left untouched
    pub fn add_component(
        &mut self,
        id: &str,
        sources: Vec<SchemaSource>,
        features: Option<FeatureSelection>,
        deviations: Option<DeviationSelection>,
    ) -> Result<()> {
        let (features, deviations) = require_selections(id, features, deviations)?;
        if self.contains(id) {
            return Err(SchemaError::DuplicateComponent {
                component_id: id.to_string(),
            });
        }
        self.components.push(ComponentEntry {
            id: id.to_string(),
            sources,
            features,
            deviations,
        });
        Ok(())
    }

    /// Remove a component, returning what was recorded for it
    ///
    /// The selections must be passed like on load; the ones recorded at load
    /// time are the ones dropped.
    ///
    /// # Errors
    ///
    /// * `MissingSupportedFeatures` - `features` or `deviations` is `None`
    /// * `UnknownComponent` - no component with this id is recorded
    pub fn remove_component(
        &mut self,
        id: &str,
        features: Option<FeatureSelection>,
        deviations: Option<DeviationSelection>,
    ) -> Result<ComponentEntry> {
        require_selections(id, features, deviations)?;
        let position = self
            .components
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| SchemaError::UnknownComponent {
                component_id: id.to_string(),
            })?;
        Ok(self.components.remove(position))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.components.iter().any(|c| c.id == id)
    }

    pub fn component(&self, id: &str) -> Option<&ComponentEntry> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Component ids in load order
    pub fn component_ids(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.id.as_str()).collect()
    }

    /// Base sources followed by every component's sources in load order
    pub fn all_sources(&self) -> Vec<SchemaSource> {
        self.base_sources
            .iter()
            .chain(self.components.iter().flat_map(|c| c.sources.iter()))
            .cloned()
            .collect()
    }

    /// Recompute supported sets, capabilities and the module-set id
    pub fn refresh(&mut self, index: &SchemaIndex) {
        let mut supported_features = BTreeMap::new();
        let mut supported_deviations = BTreeMap::new();
        let mut capabilities = BTreeMap::new();

        for module in index.modules() {
            let declared_features: BTreeSet<String> = module.features.iter().cloned().collect();
            let declared_deviations = declared_deviations(index, module);

            let features = self.supported(
                &module.namespace,
                &declared_features,
                self.base_features.as_ref(),
                |c| &c.features,
            );
            let deviations = self.supported(
                &module.namespace,
                &declared_deviations,
                self.base_deviations.as_ref(),
                |c| &c.deviations,
            );

            let id = module.id();
            capabilities.insert(
                id.clone(),
                Capability {
                    module: id.clone(),
                    language_version: module.language_version,
                    text: capability_string(module, &features, &deviations),
                },
            );
            supported_features.insert(id.clone(), features);
            supported_deviations.insert(id, deviations);
        }

        self.module_set_id = module_set_id(capabilities.values().map(|c| &c.text));
        self.supported_features = supported_features;
        self.supported_deviations = supported_deviations;
        self.capabilities = capabilities;
    }

    /// Union of every selection naming `namespace`, limited to what is
    /// declared; everything declared when no selection names it
    fn supported<F>(
        &self,
        namespace: &str,
        declared: &BTreeSet<String>,
        base: Option<&BTreeMap<String, BTreeSet<String>>>,
        selection_of: F,
    ) -> BTreeSet<String>
    where
        F: Fn(&ComponentEntry) -> &BTreeMap<String, BTreeSet<String>>,
    {
        let mut named = false;
        let mut selected = BTreeSet::new();
        let selections = base
            .into_iter()
            .chain(self.components.iter().map(selection_of));
        for selection in selections {
            if let Some(names) = selection.get(namespace) {
                named = true;
                selected.extend(names.iter().cloned());
            }
        }
        if !named {
            return declared.clone();
        }
        selected.intersection(declared).cloned().collect()
    }

    pub fn supported_features(&self, module: &ModuleId) -> Option<&BTreeSet<String>> {
        self.supported_features.get(module)
    }

    pub fn supported_deviations(&self, module: &ModuleId) -> Option<&BTreeSet<String>> {
        self.supported_deviations.get(module)
    }

    /// Sorted capability strings
    ///
    /// With `for_hello` and `exclude_v1_1`, modules written in language
    /// version 1.1 are left out; they are advertised through the module
    /// library instead.
    pub fn module_capabilities(&self, for_hello: bool, exclude_v1_1: bool) -> Vec<String> {
        let mut out: Vec<String> = self
            .capabilities
            .values()
            .filter(|c| !(for_hello && exclude_v1_1 && c.language_version == LanguageVersion::V1_1))
            .map(|c| c.text.clone())
            .collect();
        out.sort();
        out
    }

    pub fn capability(&self, module: &ModuleId) -> Option<&str> {
        self.capabilities.get(module).map(|c| c.text.as_str())
    }

    pub fn module_set_id(&self) -> &str {
        &self.module_set_id
    }
}

fn require_selections(
    id: &str,
    features: Option<FeatureSelection>,
    deviations: Option<DeviationSelection>,
) -> Result<(FeatureSelection, DeviationSelection)> {
    let features = features.ok_or_else(|| SchemaError::MissingSupportedFeatures {
        component_id: id.to_string(),
        what: "features",
    })?;
    let deviations = deviations.ok_or_else(|| SchemaError::MissingSupportedFeatures {
        component_id: id.to_string(),
        what: "deviations",
    })?;
    Ok((features, deviations))
}

/// Names of the modules that deviate `module`
fn declared_deviations(index: &SchemaIndex, module: &Module) -> BTreeSet<String> {
    index
        .modules()
        .filter(|m| m.deviation_targets.iter().any(|ns| ns == &module.namespace))
        .map(|m| m.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index;
    use crate::model::{parse_revision, SchemaTree};

    fn selection(namespace: &str, names: &[&str]) -> BTreeMap<String, BTreeSet<String>> {
        let mut map = BTreeMap::new();
        map.insert(
            namespace.to_string(),
            names.iter().map(|s| s.to_string()).collect(),
        );
        map
    }

    fn acme_index() -> SchemaIndex {
        let mut acme = Module::new("acme", "urn:acme", "acme", parse_revision("2024-01-15"));
        acme.features = vec!["fast".into(), "slow".into()];
        let mut dev = Module::new("acme-dev", "urn:acme-dev", "ad", None);
        dev.deviation_targets = vec!["urn:acme".into()];
        index::build(&SchemaTree::new(vec![acme, dev])).unwrap()
    }

    fn acme_id() -> ModuleId {
        ModuleId::new("acme", parse_revision("2024-01-15"))
    }

    #[test]
    fn test_missing_features_rejected_without_mutation() {
        let mut ledger = ComponentLedger::new();
        let err = ledger
            .add_component("c1", vec![], None, Some(DeviationSelection::new()))
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::MissingSupportedFeatures { what: "features", .. }
        ));
        assert!(ledger.component_ids().is_empty());
    }

    #[test]
    fn test_duplicate_component_rejected() {
        let mut ledger = ComponentLedger::new();
        ledger
            .add_component("c1", vec![SchemaSource::new("a", "x")], Some(FeatureSelection::new()), Some(DeviationSelection::new()))
            .unwrap();
        let before = ledger.clone();

        let err = ledger
            .add_component("c1", vec![], Some(FeatureSelection::new()), Some(DeviationSelection::new()))
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateComponent { .. }));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_remove_unknown_component() {
        let mut ledger = ComponentLedger::new();
        let err = ledger
            .remove_component("ghost", Some(FeatureSelection::new()), Some(DeviationSelection::new()))
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownComponent { .. }));
    }

    #[test]
    fn test_sources_in_load_order() {
        let mut ledger = ComponentLedger::new();
        ledger.set_base(vec![SchemaSource::new("base", "b")], None, None);
        for id in ["c1", "c2"] {
            ledger
                .add_component(id, vec![SchemaSource::new(id, id)], Some(FeatureSelection::new()), Some(DeviationSelection::new()))
                .unwrap();
        }
        let names: Vec<String> = ledger.all_sources().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["base", "c1", "c2"]);
    }

    #[test]
    fn test_unselected_module_supports_everything_declared() {
        let mut ledger = ComponentLedger::new();
        ledger.refresh(&acme_index());

        let features = ledger.supported_features(&acme_id()).unwrap();
        assert_eq!(features.len(), 2);
        let deviations = ledger.supported_deviations(&acme_id()).unwrap();
        assert!(deviations.contains("acme-dev"));
        assert_eq!(
            ledger.capability(&acme_id()),
            Some("urn:acme?module=acme&revision=2024-01-15&features=fast,slow&deviations=acme-dev")
        );
    }

    #[test]
    fn test_explicit_selection_narrows_features() {
        let mut ledger = ComponentLedger::new();
        ledger
            .add_component(
                "c1",
                vec![],
                Some(selection("urn:acme", &["fast", "undeclared"])),
                Some(selection("urn:acme", &[])),
            )
            .unwrap();
        ledger.refresh(&acme_index());

        let features = ledger.supported_features(&acme_id()).unwrap();
        assert_eq!(features.iter().collect::<Vec<_>>(), vec!["fast"]);
        assert!(ledger.supported_deviations(&acme_id()).unwrap().is_empty());
    }

    #[test]
    fn test_hello_capabilities_skip_v1_1_modules() {
        let mut modern = Module::new("modern", "urn:modern", "m", None);
        modern.language_version = LanguageVersion::V1_1;
        let legacy = Module::new("legacy", "urn:legacy", "l", None);
        let index = index::build(&SchemaTree::new(vec![modern, legacy])).unwrap();

        let mut ledger = ComponentLedger::new();
        ledger.refresh(&index);

        assert_eq!(ledger.module_capabilities(false, true).len(), 2);
        assert_eq!(ledger.module_capabilities(true, true), vec!["urn:legacy?module=legacy"]);
        assert_eq!(ledger.module_capabilities(true, false).len(), 2);
    }

    #[test]
    fn test_module_set_id_tracks_modules() {
        let mut ledger = ComponentLedger::new();
        assert_eq!(ledger.module_set_id(), EMPTY_MODULE_SET_ID);

        ledger.refresh(&acme_index());
        let first = ledger.module_set_id().to_string();
        ledger.refresh(&acme_index());
        assert_eq!(ledger.module_set_id(), first);
        assert_ne!(first, EMPTY_MODULE_SET_ID);
    }
}
