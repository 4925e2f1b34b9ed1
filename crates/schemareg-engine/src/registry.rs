//! Registry facade
//!
//! The published generation lives in an `ArcSwap`. A read loads it once
//! and answers entirely from that generation. A write takes the writer
//! mutex, copies the generation, mutates the copy and stores it only if
//! every step succeeded; a failed write leaves the published generation
//! untouched. Listeners run after the writer mutex is released, under a
//! notification lock taken before the release, so notifications arrive in
//! publication order.

use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use parking_lot::{Mutex, MutexGuard, ReentrantMutex, RwLock};

use schemareg_core::impact::{ImpactMap, ReferringNode};
use schemareg_core::index::{self, IndexedChildren};
use schemareg_core::ledger::{ComponentLedger, DeviationSelection, FeatureSelection};
use schemareg_core::validators::TypeValidator;
use schemareg_core::{
    log_op_end, log_op_error, log_op_start, AccessExpression, ModuleId, NodeRef, QName,
    RegistryConfig, Result, SchemaError, SchemaPath, SchemaSource, VerificationError,
};

use crate::generation::Generation;
use crate::listener::ModuleSetListener;
use crate::parser::SchemaSourceParser;
use crate::request_cache::RequestCache;

pub struct SchemaRegistry {
    current: ArcSwap<Generation>,
    write_lock: Mutex<()>,
    /// Held from publication until every listener has returned
    notify_lock: ReentrantMutex<()>,
    parser: Arc<dyn SchemaSourceParser>,
    listeners: RwLock<Vec<Arc<dyn ModuleSetListener>>>,
    config: RegistryConfig,
}

impl SchemaRegistry {
    /// Create a registry publishing an empty generation
    pub fn new(parser: Arc<dyn SchemaSourceParser>, config: RegistryConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(Generation::default()),
            write_lock: Mutex::new(()),
            notify_lock: ReentrantMutex::new(()),
            parser,
            listeners: RwLock::new(Vec::new()),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The published generation
    ///
    /// Holding the returned `Arc` pins that generation for as many queries
    /// as the caller wants to answer consistently.
    pub fn snapshot(&self) -> Arc<Generation> {
        self.current.load_full()
    }

    pub fn add_module_set_listener(&self, listener: Arc<dyn ModuleSetListener>) {
        self.listeners.write().push(listener);
    }

    // ========== Composition ==========

    /// Compose the base source set, keeping loaded components
    ///
    /// `None` selections leave every declared feature or deviation of the
    /// base modules active.
    ///
    /// # Errors
    ///
    /// * `Parse` - the parser rejected the source set
    /// * `DuplicatePath` / `DuplicateModule` - the module set does not compose
    /// * `Verification` - consistency checks failed; every problem is listed
    pub fn build_schema_context(
        &self,
        sources: Vec<SchemaSource>,
        features: Option<FeatureSelection>,
        deviations: Option<DeviationSelection>,
    ) -> Result<()> {
        log_op_start!("build_schema_context", source_count = sources.len());
        let start = Instant::now();

        let published = self
            .try_publish(|next| {
                let mut ledger = ComponentLedger::clone(&next.ledger);
                ledger.set_base(sources, features, deviations);
                self.compose(next, ledger)
            })
            .map_err(|e| {
                log_op_error!(
                    "build_schema_context",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                e
            })?;

        log_op_end!(
            "build_schema_context",
            duration_ms = start.elapsed().as_millis() as u64,
            generation = published.number(),
            node_count = published.index().node_count(),
            module_set_id = published.get_module_set_id()
        );
        Ok(())
    }

    /// Load a component and recompose
    ///
    /// # Errors
    ///
    /// * `MissingSupportedFeatures` - `features` or `deviations` is `None`
    /// * `DuplicateComponent` - the id is already loaded
    /// * any composition error of [`Self::build_schema_context`]
    pub fn load_schema_context(
        &self,
        component_id: &str,
        sources: Vec<SchemaSource>,
        features: Option<FeatureSelection>,
        deviations: Option<DeviationSelection>,
    ) -> Result<()> {
        log_op_start!("load_schema_context", component_id = component_id);
        let start = Instant::now();

        let published = self
            .try_publish(|next| {
                let mut ledger = ComponentLedger::clone(&next.ledger);
                ledger.add_component(component_id, sources, features, deviations)?;
                self.compose(next, ledger)
            })
            .map_err(|e| {
                log_op_error!(
                    "load_schema_context",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    component_id = component_id
                );
                e
            })?;

        log_op_end!(
            "load_schema_context",
            duration_ms = start.elapsed().as_millis() as u64,
            component_id = component_id,
            generation = published.number(),
            module_set_id = published.get_module_set_id()
        );
        Ok(())
    }

    /// Unload a component, drop its impact edges and augmented paths, and
    /// recompose
    ///
    /// # Errors
    ///
    /// * `MissingSupportedFeatures` - `features` or `deviations` is `None`
    /// * `UnknownComponent` - the id is not loaded
    /// * any composition error of [`Self::build_schema_context`]
    pub fn unload_schema_context(
        &self,
        component_id: &str,
        features: Option<FeatureSelection>,
        deviations: Option<DeviationSelection>,
    ) -> Result<()> {
        log_op_start!("unload_schema_context", component_id = component_id);
        let start = Instant::now();

        let published = self
            .try_publish(|next| {
                let mut ledger = ComponentLedger::clone(&next.ledger);
                ledger.remove_component(component_id, features, deviations)?;
                if next.impact.registered_components().any(|c| c == component_id) {
                    Arc::make_mut(&mut next.impact).deregister(component_id);
                }
                if !next.augmentations.augmented_paths(component_id).is_empty() {
                    Arc::make_mut(&mut next.augmentations).deregister_component(component_id);
                }
                self.compose(next, ledger)
            })
            .map_err(|e| {
                log_op_error!(
                    "unload_schema_context",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    component_id = component_id
                );
                e
            })?;

        log_op_end!(
            "unload_schema_context",
            duration_ms = start.elapsed().as_millis() as u64,
            component_id = component_id,
            generation = published.number(),
            module_set_id = published.get_module_set_id()
        );
        Ok(())
    }

    /// Parse the ledger's full source set, index it, verify it and install
    /// the result on `next`
    fn compose(&self, next: &mut Generation, mut ledger: ComponentLedger) -> Result<()> {
        let sources = ledger.all_sources();
        let tree = self.parser.parse(&sources)?;
        let index = index::build(&tree)?;

        if self.config.skip_verification {
            tracing::debug!("consistency verification skipped by configuration");
        } else {
            let errors = schemareg_core::rules::verify(&index, &next.impact);
            if !errors.is_empty() {
                tracing::warn!(
                    error_count = errors.len(),
                    first = %errors[0],
                    "schema verification failed"
                );
                return Err(SchemaError::Verification { errors });
            }
        }

        ledger.refresh(&index);
        tracing::debug!(
            node_count = index.node_count(),
            module_count = index.module_count(),
            "composed schema"
        );
        next.index = Arc::new(index);
        next.ledger = Arc::new(ledger);
        Ok(())
    }

    // ========== Impact Graph ==========

    /// Record that a change to `referenced` must re-validate `referring`
    pub fn register_nodes_referenced_in_constraints(
        &self,
        component_id: &str,
        referenced: SchemaPath,
        referring: SchemaPath,
        expression: AccessExpression,
    ) {
        log_op_start!(
            "register_nodes_referenced_in_constraints",
            component_id = component_id,
            schema_path = %referring
        );
        let start = Instant::now();

        let published = self.publish(|next| {
            Arc::make_mut(&mut next.impact).register(component_id, referenced, referring, expression);
        });

        log_op_end!(
            "register_nodes_referenced_in_constraints",
            duration_ms = start.elapsed().as_millis() as u64,
            generation = published.number()
        );
    }

    /// Remove every impact edge a component registered
    ///
    /// Returns the number of edges removed.
    pub fn deregister_nodes_referenced_in_constraints(&self, component_id: &str) -> usize {
        log_op_start!(
            "deregister_nodes_referenced_in_constraints",
            component_id = component_id
        );
        let start = Instant::now();

        let mut removed = 0;
        self.publish(|next| {
            removed = Arc::make_mut(&mut next.impact).deregister(component_id);
        });

        log_op_end!(
            "deregister_nodes_referenced_in_constraints",
            duration_ms = start.elapsed().as_millis() as u64,
            edge_count = removed
        );
        removed
    }

    pub fn get_referenced_nodes_for_schema_paths(&self, path: &SchemaPath) -> ImpactMap {
        self.snapshot().get_referenced_nodes_for_schema_paths(path)
    }

    pub fn add_child_impact_paths(&self, changed: &SchemaPath) -> ImpactMap {
        self.snapshot().add_child_impact_paths(changed)
    }

    pub fn referring_nodes(&self, referred: &SchemaPath) -> Vec<ReferringNode> {
        self.snapshot().referring_nodes(referred)
    }

    pub fn referring_nodes_under(&self, changed: &SchemaPath) -> Vec<ReferringNode> {
        self.snapshot().referring_nodes_under(changed)
    }

    pub fn must_referring_nodes(&self, component_id: &str) -> Vec<ReferringNode> {
        self.snapshot().must_referring_nodes(component_id)
    }

    pub fn when_referring_nodes(&self, component_id: &str) -> Vec<ReferringNode> {
        self.snapshot().when_referring_nodes(component_id)
    }

    /// Run the consistency checks against the published generation
    pub fn verify(&self) -> Vec<VerificationError> {
        self.snapshot().verify()
    }

    // ========== Schema queries ==========

    pub fn get_data_schema_node(&self, path: &SchemaPath) -> Option<NodeRef> {
        self.snapshot().get_data_schema_node(path)
    }

    pub fn get_children(&self, path: &SchemaPath) -> Vec<NodeRef> {
        self.snapshot().get_children(path)
    }

    pub fn get_non_choice_children(&self, path: &SchemaPath) -> Vec<NodeRef> {
        self.snapshot().get_non_choice_children(path)
    }

    /// # Errors
    ///
    /// `NodeNotFound` if `path` is not indexed.
    pub fn get_indexed_children(&self, path: &SchemaPath) -> Result<Arc<IndexedChildren>> {
        self.snapshot().get_indexed_children(path)
    }

    /// Indexed children memoized in a request-scoped cache
    ///
    /// # Errors
    ///
    /// `NodeNotFound` if `path` is not indexed.
    pub fn get_indexed_children_in(
        &self,
        cache: &mut RequestCache,
        path: &SchemaPath,
    ) -> Result<Arc<IndexedChildren>> {
        cache.indexed_children(&self.snapshot(), path)
    }

    /// # Errors
    ///
    /// `ParentNotFound` if `parent` is not indexed.
    pub fn child_schema_node(&self, parent: &SchemaPath, qname: &QName) -> Result<Option<NodeRef>> {
        self.snapshot().child_schema_node(parent, qname)
    }

    pub fn get_descendant_schema_path(&self, ancestor: &SchemaPath, qname: &QName) -> Option<SchemaPath> {
        self.snapshot().get_descendant_schema_path(ancestor, qname)
    }

    pub fn schema_paths_for_component(&self, component_id: &str) -> Vec<SchemaPath> {
        self.snapshot().schema_paths_for_component(component_id)
    }

    // ========== Capabilities ==========

    /// Sorted capability strings of the composed module set
    ///
    /// For hello messages, language version 1.1 modules are left out when
    /// the configuration says so.
    pub fn get_module_capabilities(&self, for_hello: bool) -> Vec<String> {
        self.snapshot()
            .get_module_capabilities(for_hello, self.config.hello_excludes_v1_1_modules)
    }

    pub fn get_capability(&self, module: &ModuleId) -> Option<String> {
        self.snapshot().get_capability(module)
    }

    pub fn get_module_set_id(&self) -> String {
        self.snapshot().get_module_set_id().to_string()
    }

    // ========== Augmentation paths ==========

    pub fn register_app_allowed_augmented_path(
        &self,
        component_id: &str,
        augmented_path: &str,
        schema_path: SchemaPath,
    ) {
        log_op_start!(
            "register_app_allowed_augmented_path",
            component_id = component_id,
            augmented_path = augmented_path
        );
        let start = Instant::now();

        self.publish(|next| {
            Arc::make_mut(&mut next.augmentations).register_app_allowed_augmented_path(
                component_id,
                augmented_path,
                schema_path,
            );
        });

        log_op_end!(
            "register_app_allowed_augmented_path",
            duration_ms = start.elapsed().as_millis() as u64
        );
    }

    pub fn register_relative_path(&self, augmented_path: &str, relative_path: &str, schema_path: SchemaPath) {
        log_op_start!(
            "register_relative_path",
            augmented_path = augmented_path,
            relative_path = relative_path
        );
        let start = Instant::now();

        self.publish(|next| {
            Arc::make_mut(&mut next.augmentations).register_relative_path(
                augmented_path,
                relative_path,
                schema_path,
            );
        });

        log_op_end!(
            "register_relative_path",
            duration_ms = start.elapsed().as_millis() as u64
        );
    }

    pub fn get_relative_path(&self, augmented_path: &str, schema_path: &SchemaPath) -> Option<String> {
        self.snapshot().get_relative_path(augmented_path, schema_path)
    }

    pub fn get_matching_path(&self, data_path: &str) -> Option<String> {
        self.snapshot().get_matching_path(data_path)
    }

    // ========== Type validators ==========

    pub fn register_type_validator(&self, type_name: &QName, validator: Arc<dyn TypeValidator>) {
        log_op_start!("register_type_validator", type_name = %type_name);
        let start = Instant::now();

        self.publish(|next| {
            Arc::make_mut(&mut next.validators).register(type_name, validator);
        });

        log_op_end!(
            "register_type_validator",
            duration_ms = start.elapsed().as_millis() as u64
        );
    }

    pub fn type_validator(&self, type_name: &QName) -> Option<Arc<dyn TypeValidator>> {
        self.snapshot().type_validator(type_name)
    }

    // ========== Publication ==========

    /// Copy the published generation, mutate the copy and publish it
    ///
    /// Nothing is published when `mutate` fails.
    fn try_publish<F>(&self, mutate: F) -> Result<Arc<Generation>>
    where
        F: FnOnce(&mut Generation) -> Result<()>,
    {
        let guard = self.write_lock.lock();
        let previous = self.current.load_full();
        let mut next = previous.successor();
        mutate(&mut next)?;
        Ok(self.install(guard, previous, next))
    }

    fn publish<F>(&self, mutate: F) -> Arc<Generation>
    where
        F: FnOnce(&mut Generation),
    {
        let guard = self.write_lock.lock();
        let previous = self.current.load_full();
        let mut next = previous.successor();
        mutate(&mut next);
        self.install(guard, previous, next)
    }

    fn install(
        &self,
        guard: MutexGuard<'_, ()>,
        previous: Arc<Generation>,
        next: Generation,
    ) -> Arc<Generation> {
        let next = Arc::new(next);
        self.current.store(next.clone());
        let notifying = self.notify_lock.lock();
        drop(guard);

        self.notify_if_changed(&previous, &next);
        drop(notifying);
        next
    }

    fn notify_if_changed(&self, previous: &Generation, next: &Generation) {
        let before = previous.get_module_set_id();
        let after = next.get_module_set_id();
        if before == after {
            return;
        }
        tracing::info!(
            previous = before,
            module_set_id = after,
            generation = next.number(),
            "module set changed"
        );
        let listeners = self.listeners.read().clone();
        for listener in listeners {
            listener.module_set_changed(before, after);
        }
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let current = self.current.load();
        f.debug_struct("SchemaRegistry")
            .field("generation", &current.number())
            .field("module_set_id", &current.get_module_set_id())
            .field("config", &self.config)
            .finish()
    }
}
