//! Browser implementation of [`FocusEnvironment`] on top of `web-sys`.

use std::cell::RefCell;
use std::rc::Rc;

use focus_core::{EventHandler, FocusEnvironment, FocusEvent, ListenerTarget};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, Window};

mod registry;

use registry::ListenerRegistry;

/// One registration as the DOM identifies it, minus the function.
type Registration = (EventTarget, FocusEvent, bool);

type JsCallback = Closure<dyn FnMut()>;

/// Focus environment for the page the module runs in.
///
/// Every distinct handler is wrapped in a single JS closure, so a removal
/// reaches the exact function object that was registered. The closure is
/// kept while the DOM holds any `(target, event, capture)` registration of
/// it and released with the last one.
pub struct WebFocusEnvironment {
    window: Option<Window>,
    document: Option<Document>,
    listeners: RefCell<ListenerRegistry<Registration, JsCallback>>,
}

impl WebFocusEnvironment {
    pub fn new() -> Self {
        let window = web_sys::window();
        let document = window.as_ref().and_then(Window::document);
        Self {
            window,
            document,
            listeners: RefCell::new(ListenerRegistry::new()),
        }
    }

    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    fn event_target<'a>(&'a self, target: ListenerTarget<'a, Element>) -> Option<&'a EventTarget> {
        match target {
            ListenerTarget::Window => self
                .window
                .as_ref()
                .map(|window| AsRef::<EventTarget>::as_ref(window)),
            ListenerTarget::Document => self
                .document
                .as_ref()
                .map(|document| AsRef::<EventTarget>::as_ref(document)),
            ListenerTarget::Element(element) => Some(AsRef::<EventTarget>::as_ref(element)),
        }
    }
}

impl Default for WebFocusEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

fn handler_key(handler: &EventHandler) -> usize {
    Rc::as_ptr(handler) as *const () as usize
}

fn js_function(callback: &JsCallback) -> &js_sys::Function {
    callback.as_ref().unchecked_ref()
}

impl FocusEnvironment for WebFocusEnvironment {
    type Element = Element;

    fn is_available(&self) -> bool {
        self.window.is_some() && self.document.is_some()
    }

    fn has_focus(&self) -> Option<bool> {
        let document = self.document.as_ref()?;
        match document.has_focus() {
            Ok(focused) => Some(focused),
            Err(err) => {
                log::debug!("WebFocusEnvironment: document.hasFocus failed: {err:?}");
                None
            }
        }
    }

    fn active_element(&self) -> Option<Element> {
        self.document.as_ref()?.active_element()
    }

    fn supports_listeners(&self, _element: &Element) -> bool {
        true
    }

    fn add_listener(
        &self,
        target: ListenerTarget<'_, Element>,
        event: FocusEvent,
        handler: &EventHandler,
        capture: bool,
    ) {
        let Some(event_target) = self.event_target(target) else {
            log::warn!("WebFocusEnvironment: no target for {event} listener");
            return;
        };
        let key = handler_key(handler);
        let registration = (event_target.clone(), event, capture);
        let mut listeners = self.listeners.borrow_mut();
        if listeners.is_registered(key, &registration) {
            return;
        }
        let fresh = if listeners.callback(key).is_none() {
            let handler = Rc::clone(handler);
            Some(Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>))
        } else {
            None
        };
        let Some(callback) = fresh.as_ref().or_else(|| listeners.callback(key)) else {
            return;
        };
        if let Err(err) = event_target.add_event_listener_with_callback_and_bool(
            event.as_str(),
            js_function(callback),
            capture,
        ) {
            log::warn!("WebFocusEnvironment: failed to add {event} listener: {err:?}");
            return;
        }
        listeners.record(key, registration, fresh);
    }

    fn remove_listener(
        &self,
        target: ListenerTarget<'_, Element>,
        event: FocusEvent,
        handler: &EventHandler,
        capture: bool,
    ) {
        let Some(event_target) = self.event_target(target) else {
            return;
        };
        let key = handler_key(handler);
        let registration = (event_target.clone(), event, capture);
        let mut listeners = self.listeners.borrow_mut();
        if !listeners.is_registered(key, &registration) {
            return;
        }
        let Some(callback) = listeners.callback(key) else {
            return;
        };
        if let Err(err) = event_target.remove_event_listener_with_callback_and_bool(
            event.as_str(),
            js_function(callback),
            capture,
        ) {
            log::warn!("WebFocusEnvironment: failed to remove {event} listener: {err:?}");
            return;
        }
        listeners.forget(key, &registration);
    }
}
