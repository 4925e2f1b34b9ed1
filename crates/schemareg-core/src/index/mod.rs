//! Schema Index
//!
//! Immutable snapshot mapping schema paths to schema nodes, built by one
//! depth-first pass over the module set handed over by the parser. See
//! [`build`] for the traversal rules.

mod build;
mod children;

pub use build::build;
pub use children::IndexedChildren;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::errors::{Result, SchemaError};
use crate::model::{Grouping, Module, ModuleId, NodeRef, QName, SchemaNode, SchemaPath, TypeDefinition};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaIndex {
    /// Data nodes, including choices, cases and operation input/output trees
    pub(crate) nodes: HashMap<SchemaPath, NodeRef>,
    /// Children with every choice and case replaced by what they contain
    pub(crate) non_choice_children: HashMap<SchemaPath, Vec<NodeRef>>,
    pub(crate) root_data_nodes: Vec<NodeRef>,
    pub(crate) actions: HashMap<SchemaPath, NodeRef>,
    pub(crate) notifications: HashMap<SchemaPath, NodeRef>,
    pub(crate) rpcs: HashMap<SchemaPath, NodeRef>,
    pub(crate) identities: HashMap<QName, NodeRef>,
    pub(crate) groupings: Vec<Grouping>,
    pub(crate) typedefs: Vec<TypeDefinition>,
    pub(crate) modules: BTreeMap<ModuleId, Arc<Module>>,
    pub(crate) namespaces: HashMap<String, ModuleId>,
    pub(crate) prefixes: HashMap<String, String>,
    /// Indexed paths grouped by the namespace of their last segment
    pub(crate) paths_by_namespace: HashMap<String, Vec<SchemaPath>>,
    /// Revision-stripped path to full path
    pub(crate) revisions: HashMap<SchemaPath, SchemaPath>,
}

impl SchemaIndex {
    /// Exact lookup of a data node
    ///
    /// Accepts the full path or its revision-stripped form.
    pub fn get_data_schema_node(&self, path: &SchemaPath) -> Option<NodeRef> {
        self.nodes
            .get(path)
            .or_else(|| self.revisions.get(path).and_then(|full| self.nodes.get(full)))
            .cloned()
    }

    /// Raw structural children: data children, the cases of a choice, or
    /// the input and output of an operation. Empty for unknown paths.
    pub fn get_children(&self, path: &SchemaPath) -> Vec<NodeRef> {
        match self.lookup_any(path) {
            Some(node) => structural_children(node),
            None => Vec::new(),
        }
    }

    /// Children with choices and cases flattened away
    pub fn get_non_choice_children(&self, path: &SchemaPath) -> Vec<NodeRef> {
        self.resolve(path)
            .and_then(|full| self.non_choice_children.get(full))
            .cloned()
            .unwrap_or_default()
    }

    /// Choice-transparent children keyed by qualified name
    ///
    /// # Errors
    ///
    /// `NodeNotFound` if `path` is not indexed.
    pub fn get_indexed_children(&self, path: &SchemaPath) -> Result<IndexedChildren> {
        if self.lookup_any(path).is_none() {
            return Err(SchemaError::NodeNotFound { path: path.clone() });
        }
        Ok(IndexedChildren::from_nodes(self.get_non_choice_children(path)))
    }

    /// Look up one choice-transparent child by name
    ///
    /// A missing child is `Ok(None)`; a parent that was never indexed is a
    /// caller defect and is reported as an error.
    pub fn child_schema_node(&self, parent: &SchemaPath, qname: &QName) -> Result<Option<NodeRef>> {
        if self.lookup_any(parent).is_none() {
            return Err(SchemaError::ParentNotFound {
                parent: parent.clone(),
                child: qname.clone(),
            });
        }
        Ok(self
            .get_non_choice_children(parent)
            .into_iter()
            .find(|child| child.qname().matches_ignoring_revision(qname)))
    }

    /// Depth-first search below `ancestor` for the first node named `qname`
    pub fn get_descendant_schema_path(&self, ancestor: &SchemaPath, qname: &QName) -> Option<SchemaPath> {
        let start = self.lookup_any(ancestor)?;
        let mut stack: Vec<NodeRef> = structural_children(start);
        stack.reverse();
        while let Some(node) = stack.pop() {
            if node.qname().matches_ignoring_revision(qname) {
                return Some(node.path().clone());
            }
            let mut children = structural_children(&node);
            children.reverse();
            stack.extend(children);
        }
        None
    }

    /// Full path for a revision-stripped one
    pub fn add_revisions(&self, stripped: &SchemaPath) -> Option<SchemaPath> {
        self.revisions.get(stripped).cloned()
    }

    pub fn contains(&self, path: &SchemaPath) -> bool {
        self.lookup_any(path).is_some()
    }

    pub fn root_data_nodes(&self) -> &[NodeRef] {
        &self.root_data_nodes
    }

    /// Every indexed data node, sorted by path
    pub fn data_nodes(&self) -> Vec<NodeRef> {
        let mut nodes: Vec<NodeRef> = self.nodes.values().cloned().collect();
        nodes.sort_by(|a, b| a.path().cmp(b.path()));
        nodes
    }

    pub fn action(&self, path: &SchemaPath) -> Option<NodeRef> {
        self.actions.get(path).cloned()
    }

    pub fn actions(&self) -> impl Iterator<Item = &NodeRef> {
        self.actions.values()
    }

    pub fn notification(&self, path: &SchemaPath) -> Option<NodeRef> {
        self.notifications.get(path).cloned()
    }

    pub fn notifications(&self) -> impl Iterator<Item = &NodeRef> {
        self.notifications.values()
    }

    pub fn rpc(&self, path: &SchemaPath) -> Option<NodeRef> {
        self.rpcs.get(path).cloned()
    }

    pub fn rpcs(&self) -> impl Iterator<Item = &NodeRef> {
        self.rpcs.values()
    }

    pub fn identity(&self, qname: &QName) -> Option<NodeRef> {
        self.identities.get(&qname.without_revision()).cloned()
    }

    pub fn groupings(&self) -> &[Grouping] {
        &self.groupings
    }

    pub fn typedefs(&self) -> &[TypeDefinition] {
        &self.typedefs
    }

    // ---- modules ----

    pub fn modules(&self) -> impl Iterator<Item = &Arc<Module>> {
        self.modules.values()
    }

    pub fn module(&self, id: &ModuleId) -> Option<Arc<Module>> {
        self.modules.get(id).cloned()
    }

    pub fn module_by_namespace(&self, namespace: &str) -> Option<Arc<Module>> {
        self.namespaces
            .get(namespace)
            .and_then(|id| self.modules.get(id))
            .cloned()
    }

    /// Newest revision of the module with this name
    pub fn module_by_name(&self, name: &str) -> Option<Arc<Module>> {
        self.modules
            .iter()
            .filter(|(id, _)| id.name == name)
            .max_by(|(a, _), (b, _)| a.revision.cmp(&b.revision))
            .map(|(_, module)| module.clone())
    }

    pub fn module_name_for_namespace(&self, namespace: &str) -> Option<&str> {
        self.namespaces.get(namespace).map(|id| id.name.as_str())
    }

    pub fn namespace_for_prefix(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    pub fn is_known_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    /// Every indexed path whose node is defined in `module`'s namespace
    ///
    /// Identities are not included; they resolve by name through
    /// `identity`, not by path.
    pub fn module_paths(&self, module: &ModuleId) -> Vec<SchemaPath> {
        self.modules
            .get(module)
            .and_then(|m| self.paths_by_namespace.get(&m.namespace))
            .cloned()
            .unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len() + self.actions.len() + self.notifications.len() + self.rpcs.len()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    // ---- internals ----

    fn resolve<'a>(&'a self, path: &'a SchemaPath) -> Option<&'a SchemaPath> {
        if self.nodes.contains_key(path)
            || self.actions.contains_key(path)
            || self.notifications.contains_key(path)
            || self.rpcs.contains_key(path)
        {
            return Some(path);
        }
        self.revisions.get(path)
    }

    fn lookup_any(&self, path: &SchemaPath) -> Option<&NodeRef> {
        let full = self.resolve(path)?;
        self.nodes
            .get(full)
            .or_else(|| self.actions.get(full))
            .or_else(|| self.notifications.get(full))
            .or_else(|| self.rpcs.get(full))
    }
}

/// Children as the schema declares them, operations expanded to input/output
pub(crate) fn structural_children(node: &SchemaNode) -> Vec<NodeRef> {
    match node.as_operation() {
        Some(op) => op.input.iter().chain(op.output.iter()).cloned().collect(),
        None => node.children().to_vec(),
    }
}
