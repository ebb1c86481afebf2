use super::*;
use std::cell::RefCell;
use std::rc::Rc;

fn logging_effect(
    log: &Rc<RefCell<Vec<String>>>,
    label: &'static str,
) -> impl FnOnce(DisposableEffectScope) -> DisposableEffectResult {
    let log = log.clone();
    move |scope| {
        log.borrow_mut().push(format!("start {label}"));
        let log = log.clone();
        scope.on_dispose(move || log.borrow_mut().push(format!("dispose {label}")))
    }
}

#[test]
fn effect_runs_once_per_key() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut slot = EffectSlot::new();

    assert!(slot.run(1, logging_effect(&log, "a")));
    assert!(!slot.run(1, logging_effect(&log, "b")));

    assert_eq!(*log.borrow(), vec!["start a"]);
    assert_eq!(slot.keys(), Some(&1));
}

#[test]
fn key_change_cleans_up_before_rerun() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut slot = EffectSlot::new();

    slot.run((1, false), logging_effect(&log, "a"));
    slot.run((1, true), logging_effect(&log, "b"));

    assert_eq!(*log.borrow(), vec!["start a", "dispose a", "start b"]);
}

#[test]
fn dispose_is_idempotent_and_rearms_the_slot() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut slot = EffectSlot::new();

    slot.run(0, logging_effect(&log, "a"));
    slot.dispose();
    slot.dispose();
    assert!(!slot.is_active());

    assert!(slot.run(0, logging_effect(&log, "b")));
    assert_eq!(*log.borrow(), vec!["start a", "dispose a", "start b"]);
}

#[test]
fn drop_runs_pending_cleanup() {
    let log = Rc::new(RefCell::new(Vec::new()));
    {
        let mut slot = EffectSlot::new();
        slot.run((), logging_effect(&log, "a"));
    }
    assert_eq!(*log.borrow(), vec!["start a", "dispose a"]);
}

#[test]
fn effect_without_cleanup_still_tracks_keys() {
    let mut slot = EffectSlot::new();
    assert!(slot.run("k", |_| DisposableEffectResult::default()));
    assert!(slot.is_active());
    assert!(!slot.run("k", |_| DisposableEffectResult::default()));
}
