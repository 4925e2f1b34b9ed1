//! schemareg core - single-threaded schema registry kernel
//!
//! This crate provides the data structures behind a composed configuration
//! schema:
//! - Data model: qualified names, schema paths, schema nodes and modules
//! - Schema Index built from a parsed module set, with choice-transparent
//!   child views and revision-insensitive lookups
//! - Component Ledger with capability strings and the module-set id
//! - Constraint Impact Graph with per-component ownership
//! - Augmentation-path registry and per-type validator cache
//! - Consistency Verifier (circular leaf-references, unique tags)
//! - Error facility, logging facility and configuration
//!
//! Concurrency and generation publication live in `schemareg-engine`.

pub mod augment;
pub mod config;
pub mod errors;
pub mod impact;
pub mod index;
pub mod ledger;
pub mod logging_facility;
pub mod model;
pub mod rules;
pub mod validators;

// Re-export commonly used types
pub use augment::AugmentationRegistry;
pub use config::RegistryConfig;
pub use errors::{ExError, ExErrorKind, Result, SchemaError, VerificationError};
pub use impact::{ImpactGraph, ImpactMap, ReferringNode};
pub use index::{IndexedChildren, SchemaIndex};
pub use ledger::{ComponentLedger, DeviationSelection, FeatureSelection};
pub use model::{AccessExpression, Module, ModuleId, NodeRef, QName, SchemaNode, SchemaPath, SchemaSource, SchemaTree};
pub use validators::{TypeValidator, TypeValidatorCache};
