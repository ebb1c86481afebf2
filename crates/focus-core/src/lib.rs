#![doc = r"Core pieces for focus-rs: reactive cells, keyed effects and the host focus abstraction."]

pub mod collections;
pub mod effect;
pub mod platform;
pub mod signals;

pub use effect::{DisposableEffectResult, DisposableEffectScope, EffectSlot};
pub use platform::{EventHandler, FocusEnvironment, FocusEvent, ListenerTarget, NodeRef};
pub use signals::{create_signal, signal, ReadSignal, WriteSignal};

#[cfg(test)]
#[path = "tests/signal_tests.rs"]
mod signal_tests;

#[cfg(test)]
#[path = "tests/effect_tests.rs"]
mod effect_tests;
