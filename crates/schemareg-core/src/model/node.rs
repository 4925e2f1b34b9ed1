//! Schema node tagged union
//!
//! Nodes are produced by the external schema-source parser and shared by
//! `Arc`. The registry indexes and queries them, it never mutates them.

use std::sync::Arc;

use super::path::SchemaPath;
use super::qname::QName;
use super::types::TypeDefinition;

/// Shared handle to a schema node
pub type NodeRef = Arc<SchemaNode>;

/// `must` / `when` constraint source text attached to a node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraints {
    pub must: Vec<String>,
    pub when: Option<String>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.when.is_none()
    }
}

/// Reusable definitions declared locally on a module or data node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalDefinitions {
    pub groupings: Vec<Grouping>,
    pub typedefs: Vec<TypeDefinition>,
}

/// A grouping. Not addressable by schema path once composed.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouping {
    pub name: QName,
    pub children: Vec<NodeRef>,
    pub definitions: LocalDefinitions,
}

/// One `unique` statement on a list: each tag is a descendant path
/// relative to the list, choice and case names omitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueConstraint {
    pub tags: Vec<Vec<QName>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerNode {
    pub path: SchemaPath,
    pub presence: bool,
    pub config: bool,
    pub constraints: Constraints,
    pub children: Vec<NodeRef>,
    pub actions: Vec<NodeRef>,
    pub notifications: Vec<NodeRef>,
    pub definitions: LocalDefinitions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListNode {
    pub path: SchemaPath,
    pub keys: Vec<QName>,
    pub unique: Vec<UniqueConstraint>,
    pub config: bool,
    pub constraints: Constraints,
    pub children: Vec<NodeRef>,
    pub actions: Vec<NodeRef>,
    pub notifications: Vec<NodeRef>,
    pub definitions: LocalDefinitions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceNode {
    pub path: SchemaPath,
    pub default_case: Option<QName>,
    pub constraints: Constraints,
    pub cases: Vec<NodeRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseNode {
    pub path: SchemaPath,
    pub constraints: Constraints,
    pub children: Vec<NodeRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    pub path: SchemaPath,
    pub ty: TypeDefinition,
    pub config: bool,
    pub mandatory: bool,
    pub default: Option<String>,
    pub constraints: Constraints,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafListNode {
    pub path: SchemaPath,
    pub ty: TypeDefinition,
    pub config: bool,
    pub constraints: Constraints,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnyDataNode {
    pub path: SchemaPath,
    pub config: bool,
    pub constraints: Constraints,
}

/// An action or remote procedure. Input and output are container nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationNode {
    pub path: SchemaPath,
    pub input: Option<NodeRef>,
    pub output: Option<NodeRef>,
    pub definitions: LocalDefinitions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationNode {
    pub path: SchemaPath,
    pub constraints: Constraints,
    pub children: Vec<NodeRef>,
    pub definitions: LocalDefinitions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentityNode {
    pub path: SchemaPath,
    pub bases: Vec<QName>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Container(ContainerNode),
    List(ListNode),
    Choice(ChoiceNode),
    Case(CaseNode),
    Leaf(LeafNode),
    LeafList(LeafListNode),
    AnyData(AnyDataNode),
    Action(OperationNode),
    Notification(NotificationNode),
    Rpc(OperationNode),
    Identity(IdentityNode),
}

impl SchemaNode {
    pub fn path(&self) -> &SchemaPath {
        match self {
            SchemaNode::Container(n) => &n.path,
            SchemaNode::List(n) => &n.path,
            SchemaNode::Choice(n) => &n.path,
            SchemaNode::Case(n) => &n.path,
            SchemaNode::Leaf(n) => &n.path,
            SchemaNode::LeafList(n) => &n.path,
            SchemaNode::AnyData(n) => &n.path,
            SchemaNode::Action(n) | SchemaNode::Rpc(n) => &n.path,
            SchemaNode::Notification(n) => &n.path,
            SchemaNode::Identity(n) => &n.path,
        }
    }

    pub fn qname(&self) -> &QName {
        self.path().last()
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            SchemaNode::Container(_) => "container",
            SchemaNode::List(_) => "list",
            SchemaNode::Choice(_) => "choice",
            SchemaNode::Case(_) => "case",
            SchemaNode::Leaf(_) => "leaf",
            SchemaNode::LeafList(_) => "leaf-list",
            SchemaNode::AnyData(_) => "anydata",
            SchemaNode::Action(_) => "action",
            SchemaNode::Notification(_) => "notification",
            SchemaNode::Rpc(_) => "rpc",
            SchemaNode::Identity(_) => "identity",
        }
    }

    /// Structural children: data children, or the cases of a choice
    pub fn children(&self) -> &[NodeRef] {
        match self {
            SchemaNode::Container(n) => &n.children,
            SchemaNode::List(n) => &n.children,
            SchemaNode::Choice(n) => &n.cases,
            SchemaNode::Case(n) => &n.children,
            SchemaNode::Notification(n) => &n.children,
            _ => &[],
        }
    }

    pub fn actions(&self) -> &[NodeRef] {
        match self {
            SchemaNode::Container(n) => &n.actions,
            SchemaNode::List(n) => &n.actions,
            _ => &[],
        }
    }

    pub fn notifications(&self) -> &[NodeRef] {
        match self {
            SchemaNode::Container(n) => &n.notifications,
            SchemaNode::List(n) => &n.notifications,
            _ => &[],
        }
    }

    pub fn definitions(&self) -> Option<&LocalDefinitions> {
        match self {
            SchemaNode::Container(n) => Some(&n.definitions),
            SchemaNode::List(n) => Some(&n.definitions),
            SchemaNode::Action(n) | SchemaNode::Rpc(n) => Some(&n.definitions),
            SchemaNode::Notification(n) => Some(&n.definitions),
            _ => None,
        }
    }

    pub fn type_definition(&self) -> Option<&TypeDefinition> {
        match self {
            SchemaNode::Leaf(n) => Some(&n.ty),
            SchemaNode::LeafList(n) => Some(&n.ty),
            _ => None,
        }
    }

    pub fn constraints(&self) -> Option<&Constraints> {
        match self {
            SchemaNode::Container(n) => Some(&n.constraints),
            SchemaNode::List(n) => Some(&n.constraints),
            SchemaNode::Choice(n) => Some(&n.constraints),
            SchemaNode::Case(n) => Some(&n.constraints),
            SchemaNode::Leaf(n) => Some(&n.constraints),
            SchemaNode::LeafList(n) => Some(&n.constraints),
            SchemaNode::AnyData(n) => Some(&n.constraints),
            SchemaNode::Notification(n) => Some(&n.constraints),
            _ => None,
        }
    }

    /// Containers and lists: nodes whose instances own a data subtree
    pub fn is_container_like(&self) -> bool {
        matches!(self, SchemaNode::Container(_) | SchemaNode::List(_))
    }

    pub fn is_choice_or_case(&self) -> bool {
        matches!(self, SchemaNode::Choice(_) | SchemaNode::Case(_))
    }

    pub fn as_list(&self) -> Option<&ListNode> {
        match self {
            SchemaNode::List(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_operation(&self) -> Option<&OperationNode> {
        match self {
            SchemaNode::Action(n) | SchemaNode::Rpc(n) => Some(n),
            _ => None,
        }
    }

    // ---- convenience constructors (parsers and fixtures) ----

    pub fn container(path: SchemaPath, children: Vec<NodeRef>) -> NodeRef {
        Arc::new(SchemaNode::Container(ContainerNode {
            path,
            presence: false,
            config: true,
            constraints: Constraints::default(),
            children,
            actions: Vec::new(),
            notifications: Vec::new(),
            definitions: LocalDefinitions::default(),
        }))
    }

    pub fn list(path: SchemaPath, keys: Vec<QName>, children: Vec<NodeRef>) -> NodeRef {
        Arc::new(SchemaNode::List(ListNode {
            path,
            keys,
            unique: Vec::new(),
            config: true,
            constraints: Constraints::default(),
            children,
            actions: Vec::new(),
            notifications: Vec::new(),
            definitions: LocalDefinitions::default(),
        }))
    }

    pub fn choice(path: SchemaPath, cases: Vec<NodeRef>) -> NodeRef {
        Arc::new(SchemaNode::Choice(ChoiceNode {
            path,
            default_case: None,
            constraints: Constraints::default(),
            cases,
        }))
    }

    pub fn case(path: SchemaPath, children: Vec<NodeRef>) -> NodeRef {
        Arc::new(SchemaNode::Case(CaseNode {
            path,
            constraints: Constraints::default(),
            children,
        }))
    }

    pub fn leaf(path: SchemaPath, ty: TypeDefinition) -> NodeRef {
        Arc::new(SchemaNode::Leaf(LeafNode {
            path,
            ty,
            config: true,
            mandatory: false,
            default: None,
            constraints: Constraints::default(),
        }))
    }

    pub fn leaf_list(path: SchemaPath, ty: TypeDefinition) -> NodeRef {
        Arc::new(SchemaNode::LeafList(LeafListNode {
            path,
            ty,
            config: true,
            constraints: Constraints::default(),
        }))
    }

    pub fn any_data(path: SchemaPath) -> NodeRef {
        Arc::new(SchemaNode::AnyData(AnyDataNode {
            path,
            config: true,
            constraints: Constraints::default(),
        }))
    }

    pub fn operation(
        path: SchemaPath,
        input: Option<NodeRef>,
        output: Option<NodeRef>,
        is_rpc: bool,
    ) -> NodeRef {
        let op = OperationNode {
            path,
            input,
            output,
            definitions: LocalDefinitions::default(),
        };
        Arc::new(if is_rpc {
            SchemaNode::Rpc(op)
        } else {
            SchemaNode::Action(op)
        })
    }

    pub fn notification(path: SchemaPath, children: Vec<NodeRef>) -> NodeRef {
        Arc::new(SchemaNode::Notification(NotificationNode {
            path,
            constraints: Constraints::default(),
            children,
            definitions: LocalDefinitions::default(),
        }))
    }
}
