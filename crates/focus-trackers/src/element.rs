use std::fmt;
use std::rc::Rc;

use focus_core::{
    signal, DisposableEffectResult, DisposableEffectScope, EffectSlot, EventHandler,
    FocusEnvironment, ListenerTarget, NodeRef, ReadSignal, WriteSignal,
};

use crate::TrackerOptions;

type Keys<E> = (Option<<E as FocusEnvironment>::Element>, TrackerOptions);

/// Tracks whether a single element holds input focus.
///
/// The tracker subscribes to the element held by a [`NodeRef`] and flips its
/// state on the focus/blur pair selected by [`TrackerOptions`]. Call
/// [`FocusTracker::track`] whenever the ref or the options may have changed;
/// the subscription is only rebuilt when they actually did.
pub struct FocusTracker<E: FocusEnvironment + 'static> {
    env: Rc<E>,
    state: ReadSignal<bool>,
    set_state: WriteSignal<bool>,
    effect: EffectSlot<Keys<E>>,
}

impl<E: FocusEnvironment + 'static> FocusTracker<E> {
    /// Create an idle tracker reporting `false`.
    pub fn new(env: Rc<E>) -> Self {
        let (state, set_state) = signal(false);
        Self {
            env,
            state,
            set_state,
            effect: EffectSlot::new(),
        }
    }

    /// Create a tracker and subscribe it right away.
    pub fn start(env: Rc<E>, node_ref: &NodeRef<E::Element>, options: TrackerOptions) -> Self {
        let mut tracker = Self::new(env);
        tracker.track(node_ref, options);
        tracker
    }

    /// Subscribe to the element currently held by `node_ref`.
    ///
    /// If the element or the options differ from the previous call, the old
    /// listeners are removed before new ones are registered. Returns whether
    /// a (re-)subscription happened.
    pub fn track(&mut self, node_ref: &NodeRef<E::Element>, options: TrackerOptions) -> bool {
        let element = node_ref.get();
        let env = Rc::clone(&self.env);
        let set_state = self.set_state.clone();
        self.effect.run((element.clone(), options), move |scope| {
            subscribe(env, element, options, set_state, scope)
        })
    }

    /// Remove every listener this tracker registered. The reported state is
    /// left as it was. Safe to call any number of times.
    pub fn stop(&mut self) {
        self.effect.dispose();
    }

    pub fn is_focused(&self) -> bool {
        self.state.get()
    }

    /// Reactive view of the focus state.
    pub fn state(&self) -> ReadSignal<bool> {
        self.state.clone()
    }

    /// Whether listeners are currently registered.
    pub fn is_subscribed(&self) -> bool {
        self.effect.is_active()
    }
}

fn subscribe<E: FocusEnvironment + 'static>(
    env: Rc<E>,
    element: Option<E::Element>,
    options: TrackerOptions,
    set_state: WriteSignal<bool>,
    scope: DisposableEffectScope,
) -> DisposableEffectResult {
    let element = match element {
        Some(element) if env.supports_listeners(&element) => element,
        _ => {
            log::warn!("FocusTracker: node reference is not attached to a valid element");
            return DisposableEffectResult::default();
        }
    };

    let (focus_event, blur_event) = options.events();
    let capture = options.capture;
    let on_focus: EventHandler = {
        let set_state = set_state.clone();
        Rc::new(move || set_state.set(true))
    };
    let on_blur: EventHandler = {
        let set_state = set_state.clone();
        Rc::new(move || set_state.set(false))
    };

    env.add_listener(ListenerTarget::Element(&element), focus_event, &on_focus, capture);
    env.add_listener(ListenerTarget::Element(&element), blur_event, &on_blur, capture);
    log::debug!("FocusTracker: listening for {focus_event}/{blur_event} on {element:?} (capture: {capture})");

    // The element may already hold focus from before the listeners existed.
    if env.active_element().as_ref() == Some(&element) {
        set_state.set(true);
    }

    scope.on_dispose(move || {
        env.remove_listener(ListenerTarget::Element(&element), focus_event, &on_focus, capture);
        env.remove_listener(ListenerTarget::Element(&element), blur_event, &on_blur, capture);
        log::debug!("FocusTracker: released listeners on {element:?}");
    })
}

impl<E: FocusEnvironment + 'static> fmt::Debug for FocusTracker<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusTracker")
            .field("focused", &self.state.get())
            .field("subscribed", &self.effect.is_active())
            .finish()
    }
}
