use focus_core::FocusEvent;

/// Configuration for [`FocusTracker`](crate::FocusTracker).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TrackerOptions {
    /// Listen to `focusin`/`focusout`, which bubble, instead of
    /// `focus`/`blur`. Focus moving onto a descendant then counts as focus
    /// on the tracked element.
    pub bubble: bool,
    /// Register listeners for the capture phase.
    pub capture: bool,
}

impl TrackerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bubble(mut self, bubble: bool) -> Self {
        self.bubble = bubble;
        self
    }

    pub fn with_capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    /// The `(focus, blur)` event pair selected by `bubble`.
    pub fn events(&self) -> (FocusEvent, FocusEvent) {
        if self.bubble {
            (FocusEvent::FocusIn, FocusEvent::FocusOut)
        } else {
            (FocusEvent::Focus, FocusEvent::Blur)
        }
    }
}
