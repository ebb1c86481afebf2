//! Reactive focus state for elements and for the window.
//!
//! [`FocusTracker`] reports whether one element holds input focus;
//! [`WindowFocusTracker`] reports whether the document as a whole has user
//! focus. Both hand out a [`ReadSignal<bool>`](focus_core::ReadSignal) that
//! updates as the host delivers focus events, and both release every
//! listener they registered when stopped or dropped.

mod element;
mod options;
mod window;

pub use element::FocusTracker;
pub use options::TrackerOptions;
pub use window::WindowFocusTracker;

pub use focus_core::{FocusEnvironment, NodeRef, ReadSignal};
