use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionId(usize);

/// A value plus the listeners that want to hear when it changes.
///
/// Listeners run synchronously inside `set`, on the thread that owns the
/// signal, in subscription order.
pub struct Signal<T> {
    value: T,
    next_id: usize,
    listeners: Vec<(SubscriptionId, Box<dyn FnMut(&T)>)>
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Signal {
            value: value,
            next_id: 0,
            listeners: Vec::new()
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;

        let value = &self.value;
        for &mut (_, ref mut listener) in self.listeners.iter_mut() {
            listener(value);
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
        where F: FnMut(&T) + 'static
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));

        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|&(listener_id, _)| listener_id != id);

        self.listeners.len() != before
    }
}

impl<T: PartialEq> Signal<T> {
    /// Like `set`, but listeners only run when the value actually changes.
    pub fn replace(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }

        self.set(value);
        true
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::Signal;

    #[test]
    fn listeners_see_every_set() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut signal = Signal::new(0);

        let sink = seen.clone();
        signal.subscribe(move |value: &i32| sink.borrow_mut().push(*value));

        signal.set(1);
        signal.set(1);
        signal.set(2);

        assert_eq!(*signal.get(), 2);
        assert_eq!(*seen.borrow(), vec![1, 1, 2]);
    }

    #[test]
    fn replace_skips_unchanged_values() {
        let calls = Rc::new(RefCell::new(0));
        let mut signal = Signal::new(false);

        let counter = calls.clone();
        signal.subscribe(move |_: &bool| *counter.borrow_mut() += 1);

        assert!(!signal.replace(false));
        assert!(signal.replace(true));
        assert!(!signal.replace(true));
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn unsubscribed_listeners_stop_hearing() {
        let calls = Rc::new(RefCell::new(0));
        let mut signal = Signal::new(0);

        let counter = calls.clone();
        let id = signal.subscribe(move |_: &i32| *counter.borrow_mut() += 1);

        signal.set(1);
        assert!(signal.unsubscribe(id));
        assert!(!signal.unsubscribe(id));
        signal.set(2);

        assert_eq!(*calls.borrow(), 1);
    }
}
