//! schemareg engine - thread-safe registry facade
//!
//! Owns the published generation of {Schema Index, Component Ledger,
//! Impact Graph, augmentation paths, type validators} and coordinates
//! readers and writers over it:
//! - reads load the current generation wait-free and never block
//! - writes are serialized, work on a copy and publish it only on success
//!
//! ## Logging Ownership
//!
//! Every mutating facade operation logs one `start` and one `end` or
//! `end_error` event. Queries do not log.

pub mod generation;
pub mod listener;
pub mod parser;
pub mod registry;
pub mod request_cache;

pub use generation::Generation;
pub use listener::ModuleSetListener;
pub use parser::SchemaSourceParser;
pub use registry::SchemaRegistry;
pub use request_cache::RequestCache;
