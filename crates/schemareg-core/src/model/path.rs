use std::fmt;
use std::sync::Arc;

use super::qname::QName;

/// Absolute schema path: a non-empty sequence of qualified names
///
/// The sequence is shared, so cloning a path is a reference-count bump.
/// Paths of nodes inside a choice include the choice and case names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaPath(Arc<[QName]>);

impl SchemaPath {
    /// Path of a top-level node
    pub fn root(qname: QName) -> Self {
        Self(Arc::from(vec![qname]))
    }

    /// Build a path from its segments; `None` when `qnames` is empty
    pub fn from_qnames(qnames: Vec<QName>) -> Option<Self> {
        if qnames.is_empty() {
            None
        } else {
            Some(Self(Arc::from(qnames)))
        }
    }

    /// Path of a child of this node
    pub fn child(&self, qname: QName) -> Self {
        let mut segments = self.0.to_vec();
        segments.push(qname);
        Self(Arc::from(segments))
    }

    /// Path of the parent node, `None` for top-level nodes
    pub fn parent(&self) -> Option<SchemaPath> {
        if self.0.len() <= 1 {
            return None;
        }
        Some(Self(Arc::from(&self.0[..self.0.len() - 1])))
    }

    pub fn last(&self) -> &QName {
        // non-empty by construction
        &self.0[self.0.len() - 1]
    }

    pub fn first(&self) -> &QName {
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn segments(&self) -> &[QName] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &QName> {
        self.0.iter()
    }

    /// True when `self` is a strict ancestor of `other`
    pub fn is_ancestor_of(&self, other: &SchemaPath) -> bool {
        self.0.len() < other.0.len() && other.0[..self.0.len()] == self.0[..]
    }

    /// Same path with every revision dropped
    pub fn without_revisions(&self) -> SchemaPath {
        Self(self.0.iter().map(QName::without_revision).collect())
    }

    /// Ancestors from the parent upwards
    pub fn ancestors(&self) -> impl Iterator<Item = SchemaPath> + '_ {
        (1..self.0.len())
            .rev()
            .map(move |end| Self(Arc::from(&self.0[..end])))
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for qname in self.0.iter() {
            write!(f, "/{}", qname)?;
        }
        Ok(())
    }
}
