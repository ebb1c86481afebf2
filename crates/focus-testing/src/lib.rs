//! Testing utilities for focus-rs.
//!
//! [`FakeDocument`] is an in-memory stand-in for a browser window and
//! document, and [`capture_logs`] records diagnostics emitted through the
//! `log` facade so tests can assert on them.

pub mod document;
pub mod logs;

pub use document::{FakeDocument, NodeId};
pub use logs::{capture_logs, take_logs, warnings, CapturedLog};
