//! Host abstraction for focus state.
//!
//! Trackers never touch a global window or document. They talk to a
//! [`FocusEnvironment`] supplied by the host: a browser adapter in
//! production, an in-memory document in tests.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Callback registered for a focus-related event. Two handlers are the same
/// registration only if they are the same allocation.
pub type EventHandler = Rc<dyn Fn()>;

/// Focus-related events a tracker can listen to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FocusEvent {
    Focus,
    Blur,
    FocusIn,
    FocusOut,
    VisibilityChange,
}

impl FocusEvent {
    /// DOM event name.
    pub fn as_str(self) -> &'static str {
        match self {
            FocusEvent::Focus => "focus",
            FocusEvent::Blur => "blur",
            FocusEvent::FocusIn => "focusin",
            FocusEvent::FocusOut => "focusout",
            FocusEvent::VisibilityChange => "visibilitychange",
        }
    }

    /// Whether the event propagates to ancestors after reaching its target.
    pub fn bubbles(self) -> bool {
        matches!(
            self,
            FocusEvent::FocusIn | FocusEvent::FocusOut | FocusEvent::VisibilityChange
        )
    }
}

impl fmt::Display for FocusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object a listener is attached to.
#[derive(Debug)]
pub enum ListenerTarget<'a, E> {
    Window,
    Document,
    Element(&'a E),
}

impl<E> Clone for ListenerTarget<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for ListenerTarget<'_, E> {}

/// Focus services provided by the host.
///
/// Listener registration follows DOM rules: a registration is identified by
/// target, event, handler identity and capture flag. Registering the same
/// combination twice is a no-op, and removal with any differing parameter
/// removes nothing.
pub trait FocusEnvironment {
    /// Handle to an element owned by the host.
    type Element: Clone + PartialEq + fmt::Debug;

    /// Whether a window and document exist at all. Non-interactive hosts
    /// return `false`.
    fn is_available(&self) -> bool {
        true
    }

    /// Whether the document currently has user focus, or `None` when the
    /// host cannot answer the question.
    fn has_focus(&self) -> Option<bool>;

    /// Element currently holding input focus.
    fn active_element(&self) -> Option<Self::Element>;

    /// Whether `element` accepts listener registration.
    fn supports_listeners(&self, element: &Self::Element) -> bool;

    fn add_listener(
        &self,
        target: ListenerTarget<'_, Self::Element>,
        event: FocusEvent,
        handler: &EventHandler,
        capture: bool,
    );

    fn remove_listener(
        &self,
        target: ListenerTarget<'_, Self::Element>,
        event: FocusEvent,
        handler: &EventHandler,
        capture: bool,
    );
}

impl<T: FocusEnvironment + ?Sized> FocusEnvironment for Rc<T> {
    type Element = T::Element;

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn has_focus(&self) -> Option<bool> {
        (**self).has_focus()
    }

    fn active_element(&self) -> Option<Self::Element> {
        (**self).active_element()
    }

    fn supports_listeners(&self, element: &Self::Element) -> bool {
        (**self).supports_listeners(element)
    }

    fn add_listener(
        &self,
        target: ListenerTarget<'_, Self::Element>,
        event: FocusEvent,
        handler: &EventHandler,
        capture: bool,
    ) {
        (**self).add_listener(target, event, handler, capture)
    }

    fn remove_listener(
        &self,
        target: ListenerTarget<'_, Self::Element>,
        event: FocusEvent,
        handler: &EventHandler,
        capture: bool,
    ) {
        (**self).remove_listener(target, event, handler, capture)
    }
}

/// Shared, externally owned slot pointing at an element, or at nothing.
///
/// The owner re-points the slot as elements are mounted and unmounted;
/// trackers only read it when they (re-)subscribe.
pub struct NodeRef<E>(Rc<RefCell<Option<E>>>);

impl<E> NodeRef<E> {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    pub fn with_element(element: E) -> Self {
        Self(Rc::new(RefCell::new(Some(element))))
    }

    pub fn set(&self, element: E) {
        *self.0.borrow_mut() = Some(element);
    }

    pub fn clear(&self) {
        *self.0.borrow_mut() = None;
    }
}

impl<E: Clone> NodeRef<E> {
    pub fn get(&self) -> Option<E> {
        self.0.borrow().clone()
    }
}

impl<E> Clone for NodeRef<E> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<E> Default for NodeRef<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: fmt::Debug> fmt::Debug for NodeRef<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&*self.0.borrow()).finish()
    }
}
