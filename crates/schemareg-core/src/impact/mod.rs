//! Constraint Impact Graph
//!
//! A forest of impact-tree nodes, one per schema path whose constraints
//! reference other nodes, plus every schema ancestor of such a path. Each
//! tree node records the paths its constraints reference and the
//! expressions doing so, with the components that registered each edge.
//!
//! Ownership is tracked per component so that deregistering a component
//! removes exactly what it added, pruning tree nodes left empty.
//!
//! Every path is keyed and reported in its revision-stripped form. Queries
//! accept either form.

mod referring;

pub use referring::ReferringNode;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::index::SchemaIndex;
use crate::model::{AccessExpression, ReferenceKind, SchemaPath};

/// Referenced path to the expressions that reference it
pub type ImpactMap = BTreeMap<SchemaPath, BTreeSet<AccessExpression>>;

type Owners = BTreeSet<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpactTreeNode {
    path: SchemaPath,
    parent: Option<SchemaPath>,
    children: BTreeSet<SchemaPath>,
    entries: BTreeMap<SchemaPath, BTreeMap<AccessExpression, Owners>>,
}

impl ImpactTreeNode {
    fn new(path: SchemaPath) -> Self {
        Self {
            parent: path.parent(),
            path,
            children: BTreeSet::new(),
            entries: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &SchemaPath {
        &self.path
    }

    pub fn parent(&self) -> Option<&SchemaPath> {
        self.parent.as_ref()
    }

    pub fn children(&self) -> &BTreeSet<SchemaPath> {
        &self.children
    }

    /// Paths referenced by this node's constraints
    pub fn referenced(&self) -> impl Iterator<Item = &SchemaPath> {
        self.entries.keys()
    }

    pub fn impact_map(&self) -> ImpactMap {
        self.entries
            .iter()
            .map(|(path, exprs)| (path.clone(), exprs.keys().cloned().collect()))
            .collect()
    }

    /// True when some constraint of this node references `path`
    pub fn references(&self, path: &SchemaPath) -> bool {
        self.entries.contains_key(&canonical(path))
    }

    /// True when a constraint of kind `kind` references `path`
    pub fn references_with_kind(&self, path: &SchemaPath, kind: ReferenceKind) -> bool {
        self.entries
            .get(&canonical(path))
            .map(|exprs| exprs.keys().any(|e| e.kind() == kind))
            .unwrap_or(false)
    }

    fn is_prunable(&self) -> bool {
        self.entries.is_empty() && self.children.is_empty()
    }
}

fn canonical(path: &SchemaPath) -> SchemaPath {
    path.without_revisions()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImpactGraph {
    nodes: HashMap<SchemaPath, ImpactTreeNode>,
    /// Referenced path to the referring paths whose constraints name it
    referred_by: HashMap<SchemaPath, BTreeSet<SchemaPath>>,
    /// Edges in registration order, per component
    registrations: BTreeMap<String, Vec<ReferringNode>>,
}

impl ImpactGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a change to `referenced` must re-validate `referring`
    ///
    /// Creates the tree node for `referring` and any missing ancestors up
    /// to the first one already present, or to the top level. Registering
    /// the same edge twice for one component is a no-op.
    pub fn register(
        &mut self,
        component_id: &str,
        referenced: SchemaPath,
        referring: SchemaPath,
        expression: AccessExpression,
    ) {
        let referenced = canonical(&referenced);
        let referring = canonical(&referring);
        self.ensure_node(&referring);
        if let Some(node) = self.nodes.get_mut(&referring) {
            node.entries
                .entry(referenced.clone())
                .or_default()
                .entry(expression.clone())
                .or_default()
                .insert(component_id.to_string());
        }
        self.referred_by
            .entry(referenced.clone())
            .or_default()
            .insert(referring.clone());

        let edge = ReferringNode::new(referenced, referring, expression);
        let edges = self
            .registrations
            .entry(component_id.to_string())
            .or_default();
        if !edges.contains(&edge) {
            edges.push(edge);
        }
    }

    /// Remove every edge registered by `component_id`
    ///
    /// Edges also registered by another component stay. Tree nodes left
    /// without entries and children are pruned, walking upwards.
    /// Returns the number of edges the component had registered.
    pub fn deregister(&mut self, component_id: &str) -> usize {
        let Some(edges) = self.registrations.remove(component_id) else {
            return 0;
        };
        for edge in &edges {
            self.remove_owner(component_id, edge);
        }
        edges.len()
    }

    fn remove_owner(&mut self, component_id: &str, edge: &ReferringNode) {
        let Some(node) = self.nodes.get_mut(&edge.referring) else {
            return;
        };
        let mut referenced_gone = false;
        if let Some(exprs) = node.entries.get_mut(&edge.referred) {
            if let Some(owners) = exprs.get_mut(&edge.expression) {
                owners.remove(component_id);
                if owners.is_empty() {
                    exprs.remove(&edge.expression);
                }
            }
            if exprs.is_empty() {
                node.entries.remove(&edge.referred);
                referenced_gone = true;
            }
        }

        if referenced_gone {
            if let Some(referring) = self.referred_by.get_mut(&edge.referred) {
                referring.remove(&edge.referring);
                if referring.is_empty() {
                    self.referred_by.remove(&edge.referred);
                }
            }
        }
        self.prune_upwards(edge.referring.clone());
    }

    fn ensure_node(&mut self, path: &SchemaPath) {
        if self.nodes.contains_key(path) {
            return;
        }
        self.nodes
            .insert(path.clone(), ImpactTreeNode::new(path.clone()));

        let mut child = path.clone();
        for ancestor in path.ancestors() {
            if let Some(existing) = self.nodes.get_mut(&ancestor) {
                existing.children.insert(child);
                return;
            }
            let mut created = ImpactTreeNode::new(ancestor.clone());
            created.children.insert(child);
            self.nodes.insert(ancestor.clone(), created);
            child = ancestor;
        }
    }

    fn prune_upwards(&mut self, start: SchemaPath) {
        let mut current = Some(start);
        while let Some(path) = current {
            let prunable = self
                .nodes
                .get(&path)
                .map(ImpactTreeNode::is_prunable)
                .unwrap_or(false);
            if !prunable {
                return;
            }
            let parent = self.nodes.remove(&path).and_then(|n| n.parent);
            if let Some(parent_path) = &parent {
                if let Some(parent_node) = self.nodes.get_mut(parent_path) {
                    parent_node.children.remove(&path);
                }
            }
            current = parent;
        }
    }

    // ---- queries ----

    pub fn tree_node(&self, path: &SchemaPath) -> Option<&ImpactTreeNode> {
        self.nodes.get(&canonical(path))
    }

    /// Paths referenced by the constraints of `path`, with their expressions
    pub fn referenced_nodes_for(&self, path: &SchemaPath) -> ImpactMap {
        self.tree_node(path)
            .map(ImpactTreeNode::impact_map)
            .unwrap_or_default()
    }

    /// Impact entries of every tree node below `changed`
    ///
    /// Descends through nodes that resolve to a container, list, choice or
    /// case in `index`, so constraints anywhere under a changed subtree are
    /// surfaced in one call.
    pub fn add_child_impact_paths(&self, changed: &SchemaPath, index: &SchemaIndex) -> ImpactMap {
        let mut out = ImpactMap::new();
        if let Some(node) = self.tree_node(changed) {
            self.collect_children(node, index, &mut out);
        }
        out
    }

    fn collect_children(&self, node: &ImpactTreeNode, index: &SchemaIndex, out: &mut ImpactMap) {
        for child_path in &node.children {
            let Some(child) = self.nodes.get(child_path) else {
                continue;
            };
            for (referenced, exprs) in child.impact_map() {
                out.entry(referenced).or_default().extend(exprs);
            }
            let descend = index
                .get_data_schema_node(child_path)
                .map(|n| n.is_container_like() || n.is_choice_or_case())
                .unwrap_or(false);
            if descend {
                self.collect_children(child, index, out);
            }
        }
    }

    /// Every tree node strictly below `path`, depth-first
    pub fn descendants(&self, path: &SchemaPath) -> Vec<&ImpactTreeNode> {
        let mut out = Vec::new();
        let mut stack: Vec<&SchemaPath> = match self.tree_node(path) {
            Some(node) => node.children.iter().rev().collect(),
            None => return out,
        };
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get(next) {
                out.push(node);
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Edges whose constraints reference `referred`
    pub fn referring_nodes(&self, referred: &SchemaPath) -> Vec<ReferringNode> {
        let mut out = Vec::new();
        self.push_referring(&canonical(referred), false, &mut out);
        out
    }

    /// Edges referencing `changed` or anything below it
    ///
    /// Edges whose referred node lies strictly below `changed` are flagged.
    pub fn referring_nodes_under(&self, changed: &SchemaPath) -> Vec<ReferringNode> {
        let changed = &canonical(changed);
        let mut referred: Vec<&SchemaPath> = self
            .referred_by
            .keys()
            .filter(|p| *p == changed || changed.is_ancestor_of(p))
            .collect();
        referred.sort();

        let mut out = Vec::new();
        for path in referred {
            self.push_referring(path, path != changed, &mut out);
        }
        out
    }

    fn push_referring(&self, referred: &SchemaPath, under_changed: bool, out: &mut Vec<ReferringNode>) {
        let Some(referring_paths) = self.referred_by.get(referred) else {
            return;
        };
        for referring in referring_paths {
            let Some(exprs) = self.nodes.get(referring).and_then(|n| n.entries.get(referred)) else {
                continue;
            };
            for expression in exprs.keys() {
                let mut edge = ReferringNode::new(referred.clone(), referring.clone(), expression.clone());
                edge.referred_under_changed = under_changed;
                out.push(edge);
            }
        }
    }

    /// `must` edges registered by a component
    pub fn must_referring_nodes(&self, component_id: &str) -> Vec<ReferringNode> {
        self.component_edges(component_id, |kind| kind == ReferenceKind::Must)
    }

    /// `when` edges, including those on augments, registered by a component
    pub fn when_referring_nodes(&self, component_id: &str) -> Vec<ReferringNode> {
        self.component_edges(component_id, |kind| kind.is_when())
    }

    fn component_edges<F>(&self, component_id: &str, keep: F) -> Vec<ReferringNode>
    where
        F: Fn(ReferenceKind) -> bool,
    {
        self.registrations
            .get(component_id)
            .map(|edges| edges.iter().filter(|e| keep(e.kind())).cloned().collect())
            .unwrap_or_default()
    }

    pub fn registered_components(&self) -> impl Iterator<Item = &str> {
        self.registrations.keys().map(String::as_str)
    }

    pub fn tree_node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
