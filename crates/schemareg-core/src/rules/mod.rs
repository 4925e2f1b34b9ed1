//! Consistency Verifier
//!
//! `invariants` holds the individual checks, each returning every problem
//! it finds; `verify` runs them together after a composition.

pub mod invariants;
pub mod verify;

pub use verify::{verify, verify_schema};
