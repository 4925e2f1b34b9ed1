//! Handles for compiled constraint expressions
//!
//! The expression compiler is external. The registry only stores what it
//! produces, tagged with the kind of constraint it came from.

use std::fmt;
use std::sync::Arc;

/// Kind of constraint a reference edge comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceKind {
    LeafRef,
    Must,
    When,
    /// A `when` attached to an augment statement
    WhenOnAugment,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::LeafRef => "leafref",
            ReferenceKind::Must => "must",
            ReferenceKind::When => "when",
            ReferenceKind::WhenOnAugment => "when-on-augment",
        }
    }

    pub fn is_when(&self) -> bool {
        matches!(self, ReferenceKind::When | ReferenceKind::WhenOnAugment)
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation hint attached to a constraint by schema annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValidationHint {
    SkipValidation,
    SkipImpactValidation,
    SkipImpactOnCreate,
}

/// Opaque compiled expression, as produced by the expression compiler
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccessExpression {
    text: Arc<str>,
    kind: ReferenceKind,
    hint: Option<ValidationHint>,
}

impl AccessExpression {
    pub fn new(text: impl AsRef<str>, kind: ReferenceKind) -> Self {
        Self {
            text: Arc::from(text.as_ref()),
            kind,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: ValidationHint) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    pub fn hint(&self) -> Option<ValidationHint> {
        self.hint
    }
}

impl fmt::Display for AccessExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind, self.text)
    }
}
