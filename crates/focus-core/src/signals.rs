use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<T> = Weak<dyn Fn(&T)>;

struct SignalCore<T> {
    value: RefCell<T>,
    listeners: RefCell<Vec<Listener<T>>>,
}

impl<T> SignalCore<T> {
    fn new(initial: T) -> Self {
        Self {
            value: RefCell::new(initial),
            listeners: RefCell::new(Vec::new()),
        }
    }

    fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.borrow().clone()
    }

    fn replace(&self, new_value: T) -> bool
    where
        T: PartialEq,
    {
        let mut current = self.value.borrow_mut();
        if *current != new_value {
            *current = new_value;
            true
        } else {
            false
        }
    }

    fn add_listener(&self, listener: &Rc<dyn Fn(&T)>) {
        self.listeners.borrow_mut().push(Rc::downgrade(listener));
    }

    fn notify(&self)
    where
        T: Clone,
    {
        // Listeners run against a snapshot so they can read the signal or
        // register further listeners while being notified.
        let live: Vec<Rc<dyn Fn(&T)>> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|weak| weak.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        let value = self.get();
        for listener in live {
            listener(&value);
        }
    }

    fn listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

/// Read handle for a signal value.
///
/// Signals are reference-counted so trackers and their observers can cheaply
/// clone handles and read the latest value whenever they need it.
pub struct ReadSignal<T>(Rc<SignalCore<T>>);

/// Write handle for a signal value.
pub struct WriteSignal<T> {
    inner: Rc<SignalCore<T>>,
    on_write: Rc<dyn Fn()>,
}

/// Create a new signal pair with the provided initial value and callback to
/// invoke whenever the value changes.
///
/// `on_write` is the hook a host uses to schedule a re-render of whatever
/// reads the signal.
pub fn create_signal<T>(initial: T, on_write: Rc<dyn Fn()>) -> (ReadSignal<T>, WriteSignal<T>) {
    let cell = Rc::new(SignalCore::new(initial));
    (
        ReadSignal(cell.clone()),
        WriteSignal {
            inner: cell,
            on_write,
        },
    )
}

/// Create a signal pair without a write callback.
pub fn signal<T>(initial: T) -> (ReadSignal<T>, WriteSignal<T>) {
    create_signal(initial, Rc::new(|| {}))
}

impl<T: Clone> ReadSignal<T> {
    /// Get the current value by cloning it out of the signal.
    pub fn get(&self) -> T {
        self.0.get()
    }

    /// Subscribe to updates from this signal.
    ///
    /// The signal only keeps a weak reference: the caller must keep the
    /// listener alive for updates to keep flowing. Dropping the listener
    /// unsubscribes it.
    pub fn subscribe(&self, listener: &Rc<dyn Fn(&T)>) {
        self.0.add_listener(listener);
    }
}

impl<T> ReadSignal<T> {
    /// Borrow the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.value.borrow())
    }

    /// Number of listeners that are still alive.
    pub fn listener_count(&self) -> usize {
        self.0.listener_count()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Clone + PartialEq> WriteSignal<T> {
    /// Replace the current value. Listeners and the write callback only run
    /// when the value actually changes.
    pub fn set(&self, new_val: T) {
        if self.inner.replace(new_val) {
            self.inner.notify();
            (self.on_write)();
        }
    }
}

impl<T> WriteSignal<T> {
    /// Read handle onto the same cell.
    pub fn read(&self) -> ReadSignal<T> {
        ReadSignal(self.inner.clone())
    }
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        ReadSignal(self.0.clone())
    }
}

impl<T> Clone for WriteSignal<T> {
    fn clone(&self) -> Self {
        WriteSignal {
            inner: self.inner.clone(),
            on_write: self.on_write.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadSignal")
            .field("value", &*self.0.value.borrow())
            .finish()
    }
}

impl<T: fmt::Debug> fmt::Debug for WriteSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteSignal")
            .field("value", &*self.inner.value.borrow())
            .finish()
    }
}
