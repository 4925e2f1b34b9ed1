use std::collections::HashMap;

use crate::model::{NodeRef, QName};

/// Choice-transparent children of one node, keyed by revision-less name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedChildren {
    by_name: HashMap<QName, NodeRef>,
}

impl IndexedChildren {
    pub fn from_nodes(nodes: Vec<NodeRef>) -> Self {
        let by_name = nodes
            .into_iter()
            .map(|node| (node.qname().without_revision(), node))
            .collect();
        Self { by_name }
    }

    /// Lookup ignoring the revision carried by `qname`
    pub fn get(&self, qname: &QName) -> Option<&NodeRef> {
        self.by_name.get(&qname.without_revision())
    }

    pub fn contains(&self, qname: &QName) -> bool {
        self.get(qname).is_some()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &QName> {
        self.by_name.keys()
    }
}
