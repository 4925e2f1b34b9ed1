use crate::errors::{Result, SchemaError, VerificationError};
use crate::impact::ImpactGraph;
use crate::index::SchemaIndex;

use super::invariants;

/// Run every consistency check and return all problems found
///
/// Checks are not fail-fast: the result lists circular leaf-references
/// first, then unresolved unique tags.
pub fn verify(index: &SchemaIndex, impact: &ImpactGraph) -> Vec<VerificationError> {
    let mut errors = invariants::find_circular_leafrefs(index, impact);
    errors.extend(invariants::find_unresolved_unique_tags(index));
    errors
}

/// Like [`verify`], folding any problem into one error
///
/// # Errors
///
/// `SchemaError::Verification` carrying every problem found.
pub fn verify_schema(index: &SchemaIndex, impact: &ImpactGraph) -> Result<()> {
    let errors = verify(index, impact);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Verification { errors })
    }
}
