use chrono::NaiveDate;
use std::fmt;

use super::node::{LocalDefinitions, NodeRef};
use super::qname::{QName, REVISION_FORMAT};

/// Module identity: name plus optional revision
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId {
    pub name: String,
    pub revision: Option<NaiveDate>,
}

impl ModuleId {
    pub fn new(name: impl Into<String>, revision: Option<NaiveDate>) -> Self {
        Self {
            name: name.into(),
            revision,
        }
    }

    pub fn revision_str(&self) -> Option<String> {
        self.revision
            .map(|r| r.format(REVISION_FORMAT).to_string())
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.revision_str() {
            Some(rev) => write!(f, "{}@{}", self.name, rev),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Version of the schema language a module is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageVersion {
    #[default]
    V1,
    V1_1,
}

/// One parsed module of the composed schema
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub namespace: String,
    pub prefix: String,
    pub revision: Option<NaiveDate>,
    pub language_version: LanguageVersion,
    /// Features declared by this module
    pub features: Vec<String>,
    /// Namespaces of the modules this module deviates
    pub deviation_targets: Vec<String>,
    pub data_children: Vec<NodeRef>,
    pub rpcs: Vec<NodeRef>,
    pub notifications: Vec<NodeRef>,
    pub identities: Vec<NodeRef>,
    pub definitions: LocalDefinitions,
    /// Name of the schema source this module was parsed from
    pub source: String,
}

impl Module {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        prefix: impl Into<String>,
        revision: Option<NaiveDate>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            prefix: prefix.into(),
            revision,
            language_version: LanguageVersion::V1,
            features: Vec::new(),
            deviation_targets: Vec::new(),
            data_children: Vec::new(),
            rpcs: Vec::new(),
            notifications: Vec::new(),
            identities: Vec::new(),
            definitions: LocalDefinitions::default(),
            source: String::new(),
        }
    }

    pub fn id(&self) -> ModuleId {
        ModuleId::new(self.name.clone(), self.revision)
    }

    /// Qualified name in this module's namespace and revision
    pub fn qname(&self, local_name: impl Into<String>) -> QName {
        match self.revision {
            Some(rev) => QName::with_revision(self.namespace.clone(), rev, local_name),
            None => QName::new(self.namespace.clone(), local_name),
        }
    }
}

/// The composed module set handed over by the schema-source parser
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaTree {
    pub modules: Vec<Module>,
}

impl SchemaTree {
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }
}
