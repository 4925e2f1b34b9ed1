use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Revision date format used by modules and qualified names
pub const REVISION_FORMAT: &str = "%Y-%m-%d";

/// Qualified name: namespace + local name, optionally pinned to a revision
///
/// Ordering is (namespace, revision, local name) so that sorted collections
/// group nodes of the same module together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QName {
    namespace: String,
    revision: Option<NaiveDate>,
    local_name: String,
}

impl QName {
    pub fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            revision: None,
            local_name: local_name.into(),
        }
    }

    pub fn with_revision(
        namespace: impl Into<String>,
        revision: NaiveDate,
        local_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            revision: Some(revision),
            local_name: local_name.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn revision(&self) -> Option<NaiveDate> {
        self.revision
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Same name in the same namespace, with the revision dropped
    pub fn without_revision(&self) -> QName {
        QName {
            namespace: self.namespace.clone(),
            revision: None,
            local_name: self.local_name.clone(),
        }
    }

    /// A sibling name in the same module (namespace and revision kept)
    pub fn sibling(&self, local_name: impl Into<String>) -> QName {
        QName {
            namespace: self.namespace.clone(),
            revision: self.revision,
            local_name: local_name.into(),
        }
    }

    /// True when both names agree on namespace and local name, ignoring revision
    pub fn matches_ignoring_revision(&self, other: &QName) -> bool {
        self.namespace == other.namespace && self.local_name == other.local_name
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.revision {
            Some(rev) => write!(
                f,
                "({}?revision={}){}",
                self.namespace,
                rev.format(REVISION_FORMAT),
                self.local_name
            ),
            None => write!(f, "({}){}", self.namespace, self.local_name),
        }
    }
}

/// Parse a `YYYY-MM-DD` revision string
pub fn parse_revision(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, REVISION_FORMAT).ok()
}
