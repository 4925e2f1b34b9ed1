use crate::errors::VerificationError;
use crate::impact::ImpactGraph;
use crate::index::SchemaIndex;
use crate::model::{QName, ReferenceKind, SchemaPath, UniqueConstraint};

/// Find leaf-references that can reach back to themselves
///
/// For every leaf whose type is or unions a leaf-reference, each path `q`
/// its constraints reference is checked:
///
/// 1. `q`'s own constraints reference the leaf (any kind)
/// 2. some impact-tree node below `q` references the leaf through a
///    leaf-reference
///
/// Descendants come from the impact forest, so the cost depends on the
/// size of `q`'s impact subtree rather than on the whole schema.
pub fn find_circular_leafrefs(index: &SchemaIndex, impact: &ImpactGraph) -> Vec<VerificationError> {
    let mut errors = Vec::new();

    for node in index.data_nodes() {
        let Some(ty) = node.type_definition() else {
            continue;
        };
        if !ty.references_leaf() {
            continue;
        }
        let leaf = node.path();

        for referenced in impact.referenced_nodes_for(leaf).keys() {
            if let Some(via) = circular_via(impact, leaf, referenced) {
                // impact paths are revision-stripped; report the indexed form
                let via = index.add_revisions(&via).unwrap_or(via);
                errors.push(VerificationError::CircularDependency {
                    leaf: leaf.clone(),
                    via,
                });
            }
        }
    }

    errors
}

fn circular_via(impact: &ImpactGraph, leaf: &SchemaPath, referenced: &SchemaPath) -> Option<SchemaPath> {
    let direct = impact
        .tree_node(referenced)
        .map(|n| n.references(leaf))
        .unwrap_or(false);
    if direct {
        return Some(referenced.clone());
    }

    impact
        .descendants(referenced)
        .into_iter()
        .find(|n| n.references_with_kind(leaf, ReferenceKind::LeafRef))
        .map(|n| n.path().clone())
}

/// Find `unique` tags that do not resolve below their list
///
/// Each tag is resolved one name at a time through choice-transparent
/// children, so choice and case names never appear in a tag.
pub fn find_unresolved_unique_tags(index: &SchemaIndex) -> Vec<VerificationError> {
    let mut errors = Vec::new();

    for node in index.data_nodes() {
        let Some(list) = node.as_list() else {
            continue;
        };
        for constraint in &list.unique {
            for tag in unresolved_tags(index, &list.path, constraint) {
                errors.push(VerificationError::UnresolvedUniqueTag {
                    list: list.path.clone(),
                    tag,
                });
            }
        }
    }

    errors
}

fn unresolved_tags(index: &SchemaIndex, list: &SchemaPath, constraint: &UniqueConstraint) -> Vec<String> {
    constraint
        .tags
        .iter()
        .filter(|tag| resolve_tag(index, list, tag).is_none())
        .map(|tag| render_tag(tag))
        .collect()
}

fn resolve_tag(index: &SchemaIndex, list: &SchemaPath, tag: &[QName]) -> Option<SchemaPath> {
    if tag.is_empty() {
        return None;
    }
    let mut current = list.clone();
    for name in tag {
        let child = index.child_schema_node(&current, name).ok()??;
        current = child.path().clone();
    }
    Some(current)
}

fn render_tag(tag: &[QName]) -> String {
    tag.iter()
        .map(|q| q.to_string())
        .collect::<Vec<_>>()
        .join("/")
}
