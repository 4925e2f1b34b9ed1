use std::sync::Arc;

/// One schema-source file as handed to the parser
///
/// Content is shared so generations can carry the full source set cheaply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSource {
    pub name: String,
    pub content: Arc<str>,
}

impl SchemaSource {
    pub fn new(name: impl Into<String>, content: impl AsRef<str>) -> Self {
        Self {
            name: name.into(),
            content: Arc::from(content.as_ref()),
        }
    }
}
