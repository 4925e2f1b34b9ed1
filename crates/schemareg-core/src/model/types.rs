use super::qname::QName;

/// Declared type of a leaf or leaf-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    /// Qualified name of the type (built-in types use the module namespace)
    pub name: QName,
    pub kind: TypeKind,
}

/// Closed set of type shapes the registry needs to reason about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// A built-in type such as `string` or `uint32`
    Builtin,
    /// Value must equal the value found at another schema path
    LeafRef { path: String },
    Union(Vec<TypeDefinition>),
    IdentityRef { base: QName },
    Enumeration(Vec<String>),
    /// A typedef restricting another type
    Derived { base: Box<TypeDefinition> },
}

impl TypeDefinition {
    pub fn builtin(name: QName) -> Self {
        Self {
            name,
            kind: TypeKind::Builtin,
        }
    }

    pub fn leafref(name: QName, path: impl Into<String>) -> Self {
        Self {
            name,
            kind: TypeKind::LeafRef { path: path.into() },
        }
    }

    /// True when the type is, derives from, or unions a leaf-reference
    pub fn references_leaf(&self) -> bool {
        match &self.kind {
            TypeKind::LeafRef { .. } => true,
            TypeKind::Union(members) => members.iter().any(TypeDefinition::references_leaf),
            TypeKind::Derived { base } => base.references_leaf(),
            TypeKind::Builtin | TypeKind::IdentityRef { .. } | TypeKind::Enumeration(_) => false,
        }
    }

    /// Leaf-reference path expressions reachable through this type
    pub fn leafref_paths(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leafref_paths(&mut out);
        out
    }

    fn collect_leafref_paths<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.kind {
            TypeKind::LeafRef { path } => out.push(path),
            TypeKind::Union(members) => {
                for m in members {
                    m.collect_leafref_paths(out);
                }
            }
            TypeKind::Derived { base } => base.collect_leafref_paths(out),
            _ => {}
        }
    }
}
