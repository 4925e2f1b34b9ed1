//! Registry of externally augmented paths
//!
//! Components declare the absolute data paths other applications may
//! augment them at, and the relative path each augmenting schema node has
//! under such a path. The data framework resolves an incoming absolute
//! path to the longest registered augmented path it starts with.

use std::collections::BTreeMap;

use crate::model::SchemaPath;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AugmentationRegistry {
    /// Component to augmented data path to the schema path it denotes
    by_component: BTreeMap<String, BTreeMap<String, SchemaPath>>,
    /// (augmented data path, schema path) to relative path
    relative_paths: BTreeMap<(String, SchemaPath), String>,
}

impl AugmentationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_app_allowed_augmented_path(
        &mut self,
        component_id: &str,
        augmented_path: &str,
        schema_path: SchemaPath,
    ) {
        self.by_component
            .entry(component_id.to_string())
            .or_default()
            .insert(normalize(augmented_path), schema_path);
    }

    pub fn register_relative_path(
        &mut self,
        augmented_path: &str,
        relative_path: &str,
        schema_path: SchemaPath,
    ) {
        self.relative_paths.insert(
            (normalize(augmented_path), schema_path),
            relative_path.to_string(),
        );
    }

    pub fn get_relative_path(&self, augmented_path: &str, schema_path: &SchemaPath) -> Option<&str> {
        self.relative_paths
            .get(&(normalize(augmented_path), schema_path.clone()))
            .map(String::as_str)
    }

    /// Longest registered augmented path that `data_path` starts with, on a
    /// `/` boundary
    pub fn get_matching_path(&self, data_path: &str) -> Option<&str> {
        let data_path = normalize(data_path);
        self.by_component
            .values()
            .flat_map(|paths| paths.keys())
            .filter(|candidate| is_path_prefix(candidate, &data_path))
            .max_by_key(|candidate| candidate.len())
            .map(String::as_str)
    }

    /// Schema path registered for an augmented data path
    pub fn schema_path_for(&self, augmented_path: &str) -> Option<&SchemaPath> {
        let key = normalize(augmented_path);
        self.by_component
            .values()
            .find_map(|paths| paths.get(&key))
    }

    pub fn augmented_paths(&self, component_id: &str) -> Vec<&str> {
        self.by_component
            .get(component_id)
            .map(|paths| paths.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Drop a component's augmented paths and the relative paths
    /// registered under them
    ///
    /// Relative paths under an augmented path another component still
    /// registers are kept. Returns the number of augmented paths removed.
    pub fn deregister_component(&mut self, component_id: &str) -> usize {
        let Some(removed) = self.by_component.remove(component_id) else {
            return 0;
        };
        let still_registered = |path: &str| {
            self.by_component
                .values()
                .any(|paths| paths.contains_key(path))
        };
        let orphaned: Vec<&String> = removed
            .keys()
            .filter(|path| !still_registered(path))
            .collect();
        self.relative_paths
            .retain(|(augmented, _), _| !orphaned.contains(&augmented));
        removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_component.is_empty() && self.relative_paths.is_empty()
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn is_path_prefix(candidate: &str, data_path: &str) -> bool {
    if candidate == "/" {
        return data_path.starts_with('/');
    }
    match data_path.strip_prefix(candidate) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
