//! Per-request memoization of derived schema views
//!
//! A cache is bound to one request and dropped with it. It is keyed by
//! path only, so entries computed against an older generation stay valid
//! for the rest of the request even if a writer publishes meanwhile.

use std::collections::HashMap;
use std::sync::Arc;

use schemareg_core::index::IndexedChildren;
use schemareg_core::{Result, SchemaPath};
use schemareg_core_types::RequestContext;

use crate::generation::Generation;

#[derive(Debug)]
pub struct RequestCache {
    context: RequestContext,
    indexed_children: HashMap<SchemaPath, Arc<IndexedChildren>>,
    hits: u64,
}

impl RequestCache {
    pub fn new(context: RequestContext) -> Self {
        Self {
            context,
            indexed_children: HashMap::new(),
            hits: 0,
        }
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Indexed children of `path`, computed on first use
    ///
    /// # Errors
    ///
    /// `NodeNotFound` if `path` is not indexed in `generation`. Failures
    /// are not cached.
    pub fn indexed_children(
        &mut self,
        generation: &Generation,
        path: &SchemaPath,
    ) -> Result<Arc<IndexedChildren>> {
        if let Some(cached) = self.indexed_children.get(path) {
            self.hits += 1;
            return Ok(cached.clone());
        }
        let computed = generation.get_indexed_children(path)?;
        self.indexed_children
            .insert(path.clone(), computed.clone());
        Ok(computed)
    }

    /// Lookups answered from the cache so far
    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn len(&self) -> usize {
        self.indexed_children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexed_children.is_empty()
    }
}

impl Drop for RequestCache {
    fn drop(&mut self) {
        tracing::trace!(
            request_id = self.context.request_id.as_str(),
            entries = self.indexed_children.len(),
            hits = self.hits,
            "request cache discarded"
        );
    }
}
