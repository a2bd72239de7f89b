//! Listener registries for widget notifications.
//!
//! Each notification is a [`Signal`] holding the listeners connected to it.
//! Emission calls every listener synchronously, in connection order, on the
//! thread that owns the widget.

use std::fmt;

/// Handle returned by [`Signal::connect`], used to disconnect the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection(u64);

/// A set of listeners for one notification carrying a `T`.
pub struct Signal<T> {
    next_id: u64,
    listeners: Vec<(Connection, Box<dyn FnMut(&T)>)>,
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Register a listener. It stays connected until disconnected or the signal is dropped.
    pub fn connect(&mut self, listener: impl FnMut(&T) + 'static) -> Connection {
        let connection = Connection(self.next_id);
        self.next_id += 1;
        self.listeners.push((connection, Box::new(listener)));
        connection
    }

    /// Remove a listener. Returns `false` if it was not connected.
    pub fn disconnect(&mut self, connection: Connection) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != connection);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn emit(&mut self, value: &T) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(value);
        }
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Every notification a [`WebViewWidget`](crate::WebViewWidget) emits.
#[derive(Debug, Default)]
pub struct Signals {
    /// A navigation has started
    pub load_started: Signal<()>,
    /// A navigation completed; `false` when it failed
    pub load_finished: Signal<bool>,
    pub url_changed: Signal<url::Url>,
    pub title_changed: Signal<String>,
    /// Load progress as a percentage, 0 to 100
    pub load_progress: Signal<i32>,
    pub can_go_back_changed: Signal<bool>,
    pub can_go_forward_changed: Signal<bool>,
}
