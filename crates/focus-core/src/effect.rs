//! Keyed side effects with cleanup.
//!
//! An [`EffectSlot`] is the explicit form of "run on mount and whenever the
//! dependencies change, clean up before the next run and on teardown". The
//! owner calls [`EffectSlot::run`] with the current dependency keys each time
//! it is evaluated; the slot decides whether the effect has to run again.

use std::fmt;

type Cleanup = Box<dyn FnOnce()>;

#[derive(Clone, Copy, Debug, Default)]
pub struct DisposableEffectScope;

/// Outcome of an effect run: the cleanup to invoke before the next run or on
/// disposal, if any.
pub struct DisposableEffectResult {
    cleanup: Option<Cleanup>,
}

impl DisposableEffectScope {
    pub fn on_dispose(&self, cleanup: impl FnOnce() + 'static) -> DisposableEffectResult {
        DisposableEffectResult::new(cleanup)
    }
}

impl DisposableEffectResult {
    pub fn new(cleanup: impl FnOnce() + 'static) -> Self {
        Self {
            cleanup: Some(Box::new(cleanup)),
        }
    }

    fn into_cleanup(self) -> Option<Cleanup> {
        self.cleanup
    }
}

impl Default for DisposableEffectResult {
    fn default() -> Self {
        Self { cleanup: None }
    }
}

impl fmt::Debug for DisposableEffectResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisposableEffectResult")
            .field("has_cleanup", &self.cleanup.is_some())
            .finish()
    }
}

/// Remembers the keys of the last effect run together with its cleanup.
pub struct EffectSlot<K> {
    keys: Option<K>,
    cleanup: Option<Cleanup>,
}

impl<K: PartialEq> EffectSlot<K> {
    pub fn new() -> Self {
        Self {
            keys: None,
            cleanup: None,
        }
    }

    fn should_run(&self, keys: &K) -> bool {
        match &self.keys {
            Some(current) => current != keys,
            None => true,
        }
    }

    /// Run `effect` if this is the first run since creation or disposal, or
    /// if `keys` differ from the keys of the previous run. The previous
    /// cleanup always completes before the effect runs again.
    ///
    /// Returns whether the effect ran.
    pub fn run<F>(&mut self, keys: K, effect: F) -> bool
    where
        F: FnOnce(DisposableEffectScope) -> DisposableEffectResult,
    {
        if !self.should_run(&keys) {
            return false;
        }
        self.run_cleanup();
        self.keys = Some(keys);
        let result = effect(DisposableEffectScope);
        self.cleanup = result.into_cleanup();
        true
    }

    /// Keys of the last run, if the slot is active.
    pub fn keys(&self) -> Option<&K> {
        self.keys.as_ref()
    }
}

impl<K> EffectSlot<K> {
    /// Whether the slot has run and not been disposed since.
    pub fn is_active(&self) -> bool {
        self.keys.is_some()
    }

    /// Run the pending cleanup and forget the keys, so the next
    /// [`EffectSlot::run`] always executes. Calling this repeatedly is a
    /// no-op.
    pub fn dispose(&mut self) {
        self.keys = None;
        self.run_cleanup();
    }

    fn run_cleanup(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl<K: PartialEq> Default for EffectSlot<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for EffectSlot<K> {
    fn drop(&mut self) {
        self.run_cleanup();
    }
}

impl<K: fmt::Debug> fmt::Debug for EffectSlot<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectSlot")
            .field("keys", &self.keys)
            .field("has_cleanup", &self.cleanup.is_some())
            .finish()
    }
}
