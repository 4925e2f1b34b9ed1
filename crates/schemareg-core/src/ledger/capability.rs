//! Capability strings and the module-set fingerprint
//!
//! A capability advertises one module with the features and deviations
//! active for it:
//!
//! ```text
//! urn:acme?module=acme&revision=2024-01-15&features=fast,slow&deviations=acme-dev
//! ```
//!
//! The module-set id is the lowercase hex SHA-256 of every capability,
//! sorted and joined by `\n`.

use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

use crate::model::Module;

/// Module-set id of an empty module set
pub const EMPTY_MODULE_SET_ID: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Render the capability string of one module
pub fn capability_string(
    module: &Module,
    features: &BTreeSet<String>,
    deviations: &BTreeSet<String>,
) -> String {
    let mut out = format!("{}?module={}", module.namespace, module.name);
    if let Some(revision) = module.id().revision_str() {
        out.push_str("&revision=");
        out.push_str(&revision);
    }
    if !features.is_empty() {
        out.push_str("&features=");
        out.push_str(&join(features));
    }
    if !deviations.is_empty() {
        out.push_str("&deviations=");
        out.push_str(&join(deviations));
    }
    out
}

/// Fingerprint of a capability set; input order does not matter
pub fn module_set_id<'a, I>(capabilities: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let mut sorted: Vec<&String> = capabilities.into_iter().collect();
    sorted.sort();
    let joined = sorted
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    hash_string(&joined)
}

fn join(items: &BTreeSet<String>) -> String {
    items.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
