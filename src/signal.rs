//! Named signals with synchronous listeners.
//!
//! Everything runs on the UI thread, so listeners are plain `FnMut` boxes
//! invoked in registration order during `emit`.

use std::fmt;

type Listener<T> = Box<dyn FnMut(&T)>;

/// A named signal carrying a payload of type `T`.
pub struct Signal<T> {
    name: &'static str,
    listeners: Vec<Listener<T>>,
}

impl<T> Signal<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: vec![],
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a listener. Listeners cannot be removed; they live as long
    /// as the widget owning the signal.
    pub fn connect<F>(&mut self, listener: F)
    where
        F: FnMut(&T) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Invoke every listener with `payload`.
    pub fn emit(&mut self, payload: &T) {
        for listener in self.listeners.iter_mut() {
            listener(payload);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
