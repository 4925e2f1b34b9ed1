use std::sync::Arc;

use super::{structural_children, SchemaIndex};
use crate::errors::{Result, SchemaError};
use crate::model::{LocalDefinitions, NodeRef, SchemaNode, SchemaPath, SchemaTree};

/// Build a Schema Index over every module of `tree`
///
/// One depth-first pass per module:
/// - data nodes are recorded under their own path, choices and cases
///   included, and containers, lists, choices and cases are recursed into
/// - actions, notifications and rpcs go to dedicated indices; their input,
///   output and notification children are indexed as data nodes
/// - groupings and typedefs are collected into flat lists, never by path
///
/// # Errors
///
/// * `DuplicateModule` - two modules share name and revision
/// * `DuplicatePath` - two nodes were composed onto one schema path
pub fn build(tree: &SchemaTree) -> Result<SchemaIndex> {
    let mut index = SchemaIndex::default();

    for module in &tree.modules {
        let id = module.id();
        if index.modules.contains_key(&id) {
            return Err(SchemaError::DuplicateModule { module: id });
        }
        index
            .namespaces
            .insert(module.namespace.clone(), id.clone());
        index
            .prefixes
            .insert(module.prefix.clone(), module.namespace.clone());
        index.modules.insert(id, Arc::new(module.clone()));
        collect_definitions(&mut index, &module.definitions);

        for node in &module.data_children {
            visit(&mut index, node)?;
            index.root_data_nodes.push(node.clone());
        }
        for node in module
            .rpcs
            .iter()
            .chain(&module.notifications)
            .chain(&module.identities)
        {
            visit(&mut index, node)?;
        }
    }

    let parents: Vec<NodeRef> = index
        .nodes
        .values()
        .chain(index.actions.values())
        .chain(index.notifications.values())
        .chain(index.rpcs.values())
        .cloned()
        .collect();
    for parent in parents {
        let mut flat = Vec::new();
        flatten_choices(structural_children(&parent), &mut flat);
        if !flat.is_empty() {
            index
                .non_choice_children
                .insert(parent.path().clone(), flat);
        }
    }

    Ok(index)
}

fn visit(index: &mut SchemaIndex, node: &NodeRef) -> Result<()> {
    let path = node.path().clone();
    if is_indexed(index, &path) {
        return Err(SchemaError::DuplicatePath { path });
    }

    match &**node {
        SchemaNode::Action(_) => {
            index.actions.insert(path.clone(), node.clone());
        }
        SchemaNode::Notification(_) => {
            index.notifications.insert(path.clone(), node.clone());
        }
        SchemaNode::Rpc(_) => {
            index.rpcs.insert(path.clone(), node.clone());
        }
        SchemaNode::Identity(_) => {
            let name = node.qname().without_revision();
            if index.identities.contains_key(&name) {
                return Err(SchemaError::DuplicatePath { path });
            }
            // keyed by name only; never a path lookup result
            index.identities.insert(name, node.clone());
            return Ok(());
        }
        _ => {
            index.nodes.insert(path.clone(), node.clone());
        }
    }
    record_path(index, &path);

    if let Some(definitions) = node.definitions() {
        collect_definitions(index, definitions);
    }
    for child in structural_children(node) {
        visit(index, &child)?;
    }
    for attached in node.actions().iter().chain(node.notifications()) {
        visit(index, attached)?;
    }
    Ok(())
}

fn is_indexed(index: &SchemaIndex, path: &SchemaPath) -> bool {
    index.nodes.contains_key(path)
        || index.actions.contains_key(path)
        || index.notifications.contains_key(path)
        || index.rpcs.contains_key(path)
}

fn record_path(index: &mut SchemaIndex, path: &SchemaPath) {
    index
        .revisions
        .insert(path.without_revisions(), path.clone());
    index
        .paths_by_namespace
        .entry(path.last().namespace().to_string())
        .or_default()
        .push(path.clone());
}

fn collect_definitions(index: &mut SchemaIndex, definitions: &LocalDefinitions) {
    for grouping in &definitions.groupings {
        index.groupings.push(grouping.clone());
        collect_definitions(index, &grouping.definitions);
    }
    index.typedefs.extend(definitions.typedefs.iter().cloned());
}

/// Replace every choice and case by the nodes it contains, recursively
fn flatten_choices(children: Vec<NodeRef>, out: &mut Vec<NodeRef>) {
    for child in children {
        if child.is_choice_or_case() {
            flatten_choices(child.children().to_vec(), out);
        } else {
            out.push(child);
        }
    }
}
