//! Structured logging facility for the schema registry
//!
//! - Single initialization point via `init(profile)`
//! - Operation boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions on emitted events
//!
//! # Usage
//!
//! ```rust
//! use schemareg_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! Registry operations log exactly one start event and exactly one end or
//! end_error event. Queries on the read path do not log.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
