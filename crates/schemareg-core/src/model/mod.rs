pub mod expression;
pub mod module;
pub mod node;
pub mod path;
pub mod qname;
pub mod source;
pub mod types;

pub use expression::{AccessExpression, ReferenceKind, ValidationHint};
pub use module::{LanguageVersion, Module, ModuleId, SchemaTree};
pub use node::{
    AnyDataNode, CaseNode, ChoiceNode, Constraints, ContainerNode, Grouping, IdentityNode,
    LeafListNode, LeafNode, ListNode, LocalDefinitions, NodeRef, NotificationNode, OperationNode,
    SchemaNode, UniqueConstraint,
};
pub use path::SchemaPath;
pub use qname::{parse_revision, QName};
pub use source::SchemaSource;
pub use types::{TypeDefinition, TypeKind};
