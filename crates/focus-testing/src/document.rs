use std::cell::RefCell;
use std::rc::Rc;

use focus_core::collections::map::HashMap;
use focus_core::{EventHandler, FocusEnvironment, FocusEvent, ListenerTarget};

/// Handle to an element created by a [`FakeDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum TargetKey {
    Window,
    Document,
    Node(NodeId),
}

impl TargetKey {
    fn from_target(target: ListenerTarget<'_, NodeId>) -> Self {
        match target {
            ListenerTarget::Window => TargetKey::Window,
            ListenerTarget::Document => TargetKey::Document,
            ListenerTarget::Element(node) => TargetKey::Node(*node),
        }
    }
}

struct Registration {
    event: FocusEvent,
    capture: bool,
    handler: EventHandler,
}

impl Registration {
    fn matches(&self, event: FocusEvent, handler: &EventHandler, capture: bool) -> bool {
        self.event == event && self.capture == capture && same_handler(&self.handler, handler)
    }
}

/// A handler picked for one dispatch, with enough of its registration to
/// check that it is still registered when its turn comes.
struct Pending {
    key: TargetKey,
    event: FocusEvent,
    capture: bool,
    handler: EventHandler,
}

fn same_handler(a: &EventHandler, b: &EventHandler) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

struct NodeData {
    parent: Option<NodeId>,
    connected: bool,
}

struct DocumentState {
    nodes: Vec<NodeData>,
    listeners: HashMap<TargetKey, Vec<Registration>>,
    active: Option<NodeId>,
    has_focus: Option<bool>,
    available: bool,
    hidden: bool,
}

/// Deterministic, single-threaded stand-in for a browser window and
/// document.
///
/// Elements form a tree. Events dispatched on an element go through a capture
/// phase on its ancestors (root first), the target phase, and for bubbling
/// events a bubble phase back up the ancestors, which is enough to exercise
/// the difference between `focus`/`blur` and `focusin`/`focusout`.
///
/// Handlers run after the internal state borrow is released, so they may
/// freely register or remove listeners. As in the DOM, a listener removed
/// while an event is being dispatched does not run for that event.
pub struct FakeDocument {
    state: RefCell<DocumentState>,
}

impl FakeDocument {
    /// An available, focused document with no elements.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(DocumentState {
                nodes: Vec::new(),
                listeners: HashMap::new(),
                active: None,
                has_focus: Some(true),
                available: true,
                hidden: false,
            }),
        }
    }

    /// A document without a window, as in a non-interactive host.
    pub fn unavailable() -> Self {
        let document = Self::new();
        document.set_available(false);
        document
    }

    /// Convenience for sharing the document with trackers.
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Create a top-level element.
    pub fn create_element(&self) -> NodeId {
        self.insert_node(None)
    }

    /// Create an element nested under `parent`.
    pub fn create_child(&self, parent: NodeId) -> NodeId {
        self.insert_node(Some(parent))
    }

    fn insert_node(&self, parent: Option<NodeId>) -> NodeId {
        let mut state = self.state.borrow_mut();
        let id = NodeId(state.nodes.len());
        state.nodes.push(NodeData {
            parent,
            connected: true,
        });
        id
    }

    /// Detach an element. It loses focus without events and stops accepting
    /// listeners; existing registrations on it are dropped.
    pub fn remove_element(&self, node: NodeId) {
        let mut state = self.state.borrow_mut();
        if let Some(data) = state.nodes.get_mut(node.0) {
            data.connected = false;
        }
        if state.active == Some(node) {
            state.active = None;
        }
        state.listeners.remove(&TargetKey::Node(node));
    }

    /// Move input focus to `node`, firing `blur`/`focusout` on the element
    /// losing focus and then `focus`/`focusin` on `node`.
    pub fn focus(&self, node: NodeId) {
        if self.state.borrow().active == Some(node) {
            return;
        }
        self.blur();
        self.state.borrow_mut().active = Some(node);
        self.dispatch(node, FocusEvent::Focus);
        self.dispatch(node, FocusEvent::FocusIn);
    }

    /// Clear input focus, firing `blur`/`focusout` on the focused element.
    pub fn blur(&self) {
        let previous = self.state.borrow_mut().active.take();
        if let Some(previous) = previous {
            self.dispatch(previous, FocusEvent::Blur);
            self.dispatch(previous, FocusEvent::FocusOut);
        }
    }

    /// Mark `node` as the active element without firing any event, as if it
    /// had been focused before anyone listened.
    pub fn set_active_element(&self, node: Option<NodeId>) {
        self.state.borrow_mut().active = node;
    }

    /// Dispatch `event` with `node` as its target.
    pub fn dispatch(&self, node: NodeId, event: FocusEvent) {
        let pending = self.collect_element_handlers(node, event);
        log::trace!(
            "FakeDocument: {event} on {node:?} reaches {} handler(s)",
            pending.len()
        );
        self.run(pending);
    }

    /// Window gains focus and fires `focus`.
    pub fn focus_window(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.has_focus.is_some() {
                state.has_focus = Some(true);
            }
        }
        self.dispatch_window(FocusEvent::Focus);
    }

    /// Window loses focus and fires `blur`.
    pub fn blur_window(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.has_focus.is_some() {
                state.has_focus = Some(false);
            }
        }
        self.dispatch_window(FocusEvent::Blur);
    }

    /// Change page visibility and fire `visibilitychange` on the document. A
    /// hidden page never has focus.
    pub fn set_hidden(&self, hidden: bool) {
        {
            let mut state = self.state.borrow_mut();
            state.hidden = hidden;
            if hidden && state.has_focus.is_some() {
                state.has_focus = Some(false);
            }
        }
        self.dispatch_document(FocusEvent::VisibilityChange);
    }

    pub fn is_hidden(&self) -> bool {
        self.state.borrow().hidden
    }

    /// Fire `event` on the window without touching any state.
    pub fn dispatch_window(&self, event: FocusEvent) {
        self.run(self.collect_handlers(TargetKey::Window, event, None));
    }

    /// Fire `event` on the document without touching any state.
    pub fn dispatch_document(&self, event: FocusEvent) {
        self.run(self.collect_handlers(TargetKey::Document, event, None));
    }

    /// Override the answer to [`FocusEnvironment::has_focus`]. `None` models
    /// a host without the query.
    pub fn set_has_focus(&self, has_focus: Option<bool>) {
        self.state.borrow_mut().has_focus = has_focus;
    }

    pub fn set_available(&self, available: bool) {
        self.state.borrow_mut().available = available;
    }

    /// Total number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.values().map(Vec::len).sum()
    }

    /// Number of listeners registered on `node`.
    pub fn listeners_on(&self, node: NodeId) -> usize {
        self.count_on(TargetKey::Node(node))
    }

    pub fn window_listener_count(&self) -> usize {
        self.count_on(TargetKey::Window)
    }

    pub fn document_listener_count(&self) -> usize {
        self.count_on(TargetKey::Document)
    }

    fn count_on(&self, key: TargetKey) -> usize {
        self.state
            .borrow()
            .listeners
            .get(&key)
            .map_or(0, Vec::len)
    }

    fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let state = self.state.borrow();
        let mut chain = Vec::new();
        let mut current = state.nodes.get(node.0).and_then(|data| data.parent);
        while let Some(id) = current {
            chain.push(id);
            current = state.nodes.get(id.0).and_then(|data| data.parent);
        }
        chain
    }

    fn run(&self, pending: Vec<Pending>) {
        for entry in pending {
            if self.is_registered(&entry) {
                (entry.handler)();
            }
        }
    }

    fn is_registered(&self, entry: &Pending) -> bool {
        self.state
            .borrow()
            .listeners
            .get(&entry.key)
            .is_some_and(|registrations| {
                registrations
                    .iter()
                    .any(|r| r.matches(entry.event, &entry.handler, entry.capture))
            })
    }

    fn collect_element_handlers(&self, node: NodeId, event: FocusEvent) -> Vec<Pending> {
        let ancestors = self.ancestors(node);
        let mut handlers = Vec::new();
        for ancestor in ancestors.iter().rev() {
            handlers.extend(self.collect_handlers(TargetKey::Node(*ancestor), event, Some(true)));
        }
        handlers.extend(self.collect_handlers(TargetKey::Node(node), event, None));
        if event.bubbles() {
            for ancestor in &ancestors {
                handlers.extend(self.collect_handlers(
                    TargetKey::Node(*ancestor),
                    event,
                    Some(false),
                ));
            }
        }
        handlers
    }

    /// Handlers on `key` for `event`, restricted to one phase when `capture`
    /// is set.
    fn collect_handlers(
        &self,
        key: TargetKey,
        event: FocusEvent,
        capture: Option<bool>,
    ) -> Vec<Pending> {
        let state = self.state.borrow();
        state
            .listeners
            .get(&key)
            .map(|registrations| {
                registrations
                    .iter()
                    .filter(|entry| entry.event == event)
                    .filter(|entry| capture.map_or(true, |phase| entry.capture == phase))
                    .map(|entry| Pending {
                        key,
                        event,
                        capture: entry.capture,
                        handler: Rc::clone(&entry.handler),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for FakeDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusEnvironment for FakeDocument {
    type Element = NodeId;

    fn is_available(&self) -> bool {
        self.state.borrow().available
    }

    fn has_focus(&self) -> Option<bool> {
        let state = self.state.borrow();
        if state.available {
            state.has_focus
        } else {
            None
        }
    }

    fn active_element(&self) -> Option<NodeId> {
        self.state.borrow().active
    }

    fn supports_listeners(&self, element: &NodeId) -> bool {
        self.state
            .borrow()
            .nodes
            .get(element.0)
            .is_some_and(|data| data.connected)
    }

    fn add_listener(
        &self,
        target: ListenerTarget<'_, NodeId>,
        event: FocusEvent,
        handler: &EventHandler,
        capture: bool,
    ) {
        let key = TargetKey::from_target(target);
        let mut state = self.state.borrow_mut();
        let registrations = state.listeners.entry(key).or_default();
        if registrations
            .iter()
            .any(|entry| entry.matches(event, handler, capture))
        {
            return;
        }
        log::trace!("FakeDocument: add {event} listener on {key:?} (capture: {capture})");
        registrations.push(Registration {
            event,
            capture,
            handler: Rc::clone(handler),
        });
    }

    fn remove_listener(
        &self,
        target: ListenerTarget<'_, NodeId>,
        event: FocusEvent,
        handler: &EventHandler,
        capture: bool,
    ) {
        let key = TargetKey::from_target(target);
        let mut state = self.state.borrow_mut();
        if let Some(registrations) = state.listeners.get_mut(&key) {
            registrations.retain(|entry| !entry.matches(event, handler, capture));
            if registrations.is_empty() {
                state.listeners.remove(&key);
            }
        }
    }
}
