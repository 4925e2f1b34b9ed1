use schemareg_core::{Result, SchemaSource, SchemaTree};

/// External schema-source parser
///
/// Turns the full source set of a composition into one module set. The
/// registry calls it with base sources first, then each loaded
/// component's sources in load order.
pub trait SchemaSourceParser: Send + Sync {
    /// # Errors
    ///
    /// Implementations report unparseable input as `SchemaError::Parse`.
    fn parse(&self, sources: &[SchemaSource]) -> Result<SchemaTree>;
}
