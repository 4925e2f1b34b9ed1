//! Per-type value validators
//!
//! The cache lives on a generation and is copied with it; there is no
//! process-wide instance.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::model::QName;

/// Checks a lexical value against one type
pub trait TypeValidator: Send + Sync {
    fn validate(&self, value: &str) -> std::result::Result<(), String>;
}

impl<F> TypeValidator for F
where
    F: Fn(&str) -> std::result::Result<(), String> + Send + Sync,
{
    fn validate(&self, value: &str) -> std::result::Result<(), String> {
        self(value)
    }
}

#[derive(Clone, Default)]
pub struct TypeValidatorCache {
    validators: HashMap<QName, Arc<dyn TypeValidator>>,
}

impl TypeValidatorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validator, replacing any previous one for the type.
    /// Keys ignore revisions.
    pub fn register(&mut self, type_name: &QName, validator: Arc<dyn TypeValidator>) {
        self.validators
            .insert(type_name.without_revision(), validator);
    }

    pub fn get(&self, type_name: &QName) -> Option<Arc<dyn TypeValidator>> {
        self.validators
            .get(&type_name.without_revision())
            .cloned()
    }

    /// `None` when no validator is registered for the type
    pub fn validate(&self, type_name: &QName, value: &str) -> Option<std::result::Result<(), String>> {
        self.get(type_name).map(|v| v.validate(value))
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for TypeValidatorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.validators.keys().map(|q| q.to_string()).collect();
        names.sort();
        f.debug_struct("TypeValidatorCache")
            .field("types", &names)
            .finish()
    }
}
