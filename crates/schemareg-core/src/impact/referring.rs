use crate::model::{AccessExpression, ReferenceKind, SchemaPath, ValidationHint};

/// One constraint edge as seen from the node it refers to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReferringNode {
    pub referred: SchemaPath,
    pub referring: SchemaPath,
    pub expression: AccessExpression,
    /// The referred node lies strictly below the node that changed
    pub referred_under_changed: bool,
}

impl ReferringNode {
    pub fn new(referred: SchemaPath, referring: SchemaPath, expression: AccessExpression) -> Self {
        Self {
            referred,
            referring,
            expression,
            referred_under_changed: false,
        }
    }

    pub fn kind(&self) -> ReferenceKind {
        self.expression.kind()
    }

    pub fn hint(&self) -> Option<ValidationHint> {
        self.expression.hint()
    }
}
