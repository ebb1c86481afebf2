use super::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[test]
fn set_notifies_listeners_only_on_change() {
    let (read, write) = signal(false);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let listener: Rc<dyn Fn(&bool)> = Rc::new(move |value: &bool| sink.borrow_mut().push(*value));
    read.subscribe(&listener);

    write.set(true);
    write.set(true);
    write.set(false);

    assert_eq!(*seen.borrow(), vec![true, false]);
    assert!(!read.get());
}

#[test]
fn write_callback_runs_after_effective_writes() {
    let writes = Rc::new(Cell::new(0));
    let counter = writes.clone();
    let (read, write) = create_signal(0, Rc::new(move || counter.set(counter.get() + 1)));

    write.set(0);
    assert_eq!(writes.get(), 0);
    write.set(3);
    write.set(4);
    assert_eq!(writes.get(), 2);
    assert_eq!(read.get(), 4);
}

#[test]
fn dropping_listener_unsubscribes() {
    let (read, write) = signal(0);
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();
    let listener: Rc<dyn Fn(&i32)> = Rc::new(move |_: &i32| counter.set(counter.get() + 1));
    read.subscribe(&listener);
    assert_eq!(read.listener_count(), 1);

    write.set(1);
    drop(listener);
    write.set(2);

    assert_eq!(hits.get(), 1);
    assert_eq!(read.listener_count(), 0);
}

#[test]
fn listener_can_read_signal_during_notification() {
    let (read, write) = signal(1);
    let observed = Rc::new(Cell::new(0));
    let reader = read.clone();
    let out = observed.clone();
    let listener: Rc<dyn Fn(&i32)> = Rc::new(move |_: &i32| out.set(reader.get() * 10));
    read.subscribe(&listener);

    write.set(7);

    assert_eq!(observed.get(), 70);
}

#[test]
fn read_handles_share_one_cell() {
    let (read, write) = signal(String::from("a"));
    let other = write.read();
    assert!(read.ptr_eq(&other));
    write.set(String::from("b"));
    assert_eq!(other.with(|value| value.len()), 1);
    assert_eq!(read.get(), "b");
}
