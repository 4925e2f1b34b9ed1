//! Types shared by every schemareg crate
//!
//! - **Correlation**: `RequestId`, `RequestContext`
//! - **Log schema**: canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId};
