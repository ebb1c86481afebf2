use focus_core::FocusEvent;
use focus_testing::{capture_logs, take_logs, warnings, FakeDocument};
use focus_trackers::WindowFocusTracker;

#[test]
fn initial_state_follows_the_focus_query() {
    let document = FakeDocument::shared();
    let tracker = WindowFocusTracker::start(document.clone());
    assert!(tracker.is_focused());

    let document = FakeDocument::shared();
    document.set_has_focus(Some(false));
    let tracker = WindowFocusTracker::start(document.clone());
    assert!(!tracker.is_focused());
}

#[test]
fn registers_one_handler_on_three_channels() {
    let document = FakeDocument::shared();
    let tracker = WindowFocusTracker::start(document.clone());

    assert!(tracker.is_subscribed());
    assert_eq!(document.window_listener_count(), 2);
    assert_eq!(document.document_listener_count(), 1);
}

#[test]
fn window_blur_and_focus_flip_state() {
    let document = FakeDocument::shared();
    let tracker = WindowFocusTracker::start(document.clone());

    document.blur_window();
    assert!(!tracker.is_focused());

    document.focus_window();
    assert!(tracker.is_focused());
}

#[test]
fn visibility_change_requeries_focus() {
    let document = FakeDocument::shared();
    let tracker = WindowFocusTracker::start(document.clone());

    document.set_has_focus(Some(false));
    assert!(tracker.is_focused());
    document.dispatch_document(FocusEvent::VisibilityChange);
    assert!(!tracker.is_focused());
}

#[test]
fn hiding_the_page_reports_unfocused() {
    let document = FakeDocument::shared();
    let tracker = WindowFocusTracker::start(document.clone());

    document.set_hidden(true);
    assert!(document.is_hidden());
    assert!(!tracker.is_focused());
}

#[test]
fn missing_focus_query_fails_open() {
    let document = FakeDocument::shared();
    document.set_has_focus(None);
    let tracker = WindowFocusTracker::start(document.clone());

    // The initial value is false, the immediate update corrects it.
    assert!(tracker.is_focused());

    document.blur_window();
    assert!(tracker.is_focused());
}

#[test]
fn unavailable_environment_skips_subscription() {
    capture_logs();
    let document = std::rc::Rc::new(FakeDocument::unavailable());
    let tracker = WindowFocusTracker::start(document.clone());

    assert!(!tracker.is_subscribed());
    assert!(!tracker.is_focused());
    assert_eq!(document.listener_count(), 0);
    assert!(warnings().is_empty());
    let logs = take_logs();
    assert!(logs
        .iter()
        .any(|entry| entry.level == log::Level::Debug && entry.message.contains("not subscribing")));

    document.dispatch_window(FocusEvent::Focus);
    assert!(!tracker.is_focused());
}

#[test]
fn stop_releases_every_listener() {
    let document = FakeDocument::shared();
    let mut tracker = WindowFocusTracker::start(document.clone());

    tracker.stop();
    tracker.stop();

    assert_eq!(document.listener_count(), 0);
    document.blur_window();
    assert!(tracker.is_focused());
}

#[test]
fn dropping_the_tracker_releases_every_listener() {
    let document = FakeDocument::shared();
    let tracker = WindowFocusTracker::start(document.clone());
    let state = tracker.state();
    drop(tracker);

    assert_eq!(document.listener_count(), 0);
    document.blur_window();
    assert!(state.get());
}
