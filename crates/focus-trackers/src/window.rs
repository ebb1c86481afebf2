use std::fmt;
use std::rc::Rc;

use focus_core::{
    signal, EffectSlot, EventHandler, FocusEnvironment, FocusEvent, ListenerTarget, ReadSignal,
    WriteSignal,
};

/// Channels that can change whether the document has focus.
const CHANNELS: [(Channel, FocusEvent); 3] = [
    (Channel::Window, FocusEvent::Focus),
    (Channel::Window, FocusEvent::Blur),
    (Channel::Document, FocusEvent::VisibilityChange),
];

#[derive(Clone, Copy)]
enum Channel {
    Window,
    Document,
}

impl Channel {
    fn target<E>(self) -> ListenerTarget<'static, E> {
        match self {
            Channel::Window => ListenerTarget::Window,
            Channel::Document => ListenerTarget::Document,
        }
    }
}

/// Tracks whether the application's window has user focus.
///
/// Window `focus`/`blur` and document `visibilitychange` all trigger a fresh
/// [`FocusEnvironment::has_focus`] query, so switching tabs is noticed as
/// well as switching windows.
pub struct WindowFocusTracker<E: FocusEnvironment + 'static> {
    state: ReadSignal<bool>,
    effect: EffectSlot<()>,
    // Held so the environment outlives the registered listeners.
    _env: Rc<E>,
}

impl<E: FocusEnvironment + 'static> WindowFocusTracker<E> {
    /// Compute the initial focus state and subscribe to the window.
    ///
    /// Without an available environment nothing is registered and the state
    /// stays `false`.
    pub fn start(env: Rc<E>) -> Self {
        let available = env.is_available();
        let initial = available && env.has_focus().unwrap_or(false);
        let (state, set_state) = signal(initial);
        let mut effect = EffectSlot::new();
        if available {
            let env = Rc::clone(&env);
            effect.run((), move |scope| {
                let handler = update_handler(Rc::clone(&env), set_state);
                for (channel, event) in CHANNELS {
                    env.add_listener(channel.target(), event, &handler, false);
                }
                // Focus may have moved between the initial query and now.
                handler();
                log::debug!("WindowFocusTracker: listening for window focus changes");
                scope.on_dispose(move || {
                    for (channel, event) in CHANNELS {
                        env.remove_listener(channel.target(), event, &handler, false);
                    }
                    log::debug!("WindowFocusTracker: released window listeners");
                })
            });
        } else {
            log::debug!("WindowFocusTracker: no window available, not subscribing");
        }
        Self {
            state,
            effect,
            _env: env,
        }
    }

    /// Remove every listener this tracker registered. Safe to call any
    /// number of times.
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

/// Re-query the host on every event. A host that cannot answer is treated as
/// focused.
fn update_handler<E: FocusEnvironment + 'static>(
    env: Rc<E>,
    set_state: WriteSignal<bool>,
) -> EventHandler {
    Rc::new(move || set_state.set(env.has_focus().unwrap_or(true)))
}

impl<E: FocusEnvironment + 'static> fmt::Debug for WindowFocusTracker<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowFocusTracker")
            .field("focused", &self.state.get())
            .field("subscribed", &self.effect.is_active())
            .finish()
    }
}
