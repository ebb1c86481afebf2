//! Bookkeeping of which host registrations each handler currently holds.
//!
//! The browser only knows the JS function it was given, so the adapter must
//! keep that function alive exactly as long as at least one
//! `(target, event, capture)` registration of it exists in the DOM.

use focus_core::collections::map::{Entry, HashMap};

struct Registered<R, C> {
    callback: C,
    registrations: Vec<R>,
}

/// Callbacks keyed by handler identity, each with the registrations the
/// host currently holds for it. `R` identifies one registration, `C` is the
/// host-side callback that must outlive all of them.
pub(crate) struct ListenerRegistry<R, C> {
    entries: HashMap<usize, Registered<R, C>>,
}

impl<R: PartialEq, C> ListenerRegistry<R, C> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub(crate) fn is_registered(&self, key: usize, registration: &R) -> bool {
        self.entries
            .get(&key)
            .is_some_and(|entry| entry.registrations.contains(registration))
    }

    pub(crate) fn callback(&self, key: usize) -> Option<&C> {
        self.entries.get(&key).map(|entry| &entry.callback)
    }

    /// Record a registration the host accepted. `fresh` is the callback that
    /// was handed to the host when none existed yet for `key`; it is dropped
    /// if one is already stored. Returns `false` only if `key` is unknown and
    /// no callback was supplied.
    pub(crate) fn record(&mut self, key: usize, registration: R, fresh: Option<C>) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(mut entry) => {
                let registrations = &mut entry.get_mut().registrations;
                if !registrations.contains(&registration) {
                    registrations.push(registration);
                }
                true
            }
            Entry::Vacant(entry) => match fresh {
                Some(callback) => {
                    entry.insert(Registered {
                        callback,
                        registrations: vec![registration],
                    });
                    true
                }
                None => false,
            },
        }
    }

    /// Forget a registration the host released. The callback is dropped with
    /// the last registration of its handler. Returns whether the
    /// registration was known.
    pub(crate) fn forget(&mut self, key: usize, registration: &R) -> bool {
        let Entry::Occupied(mut entry) = self.entries.entry(key) else {
            return false;
        };
        let registrations = &mut entry.get_mut().registrations;
        let Some(index) = registrations.iter().position(|r| r == registration) else {
            return false;
        };
        registrations.swap_remove(index);
        if registrations.is_empty() {
            entry.remove();
        }
        true
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
