use std::sync::mpsc;

/// Identifies one `evaluate_javascript_with` request until its result comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptId(pub u64);

/// An event reported by a native engine.
///
/// Engines push these into their [`EventHandler`]. The application hands them
/// back to [`WebViewWidget::dispatch`](crate::WebViewWidget::dispatch), which
/// turns them into signal emissions.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Navigation status has changed.
    Navigation(NavigationEvent),
    /// The current location changed. `None` when the engine has no location.
    UrlChanged(Option<String>),
    /// The document title changed.
    TitleChanged(Option<String>),
    /// Estimated load progress, from 0.0 to 1.0.
    ProgressChanged(f64),
    /// Whether there is a history entry behind the current one.
    CanGoBackChanged(bool),
    /// Whether there is a history entry ahead of the current one.
    CanGoForwardChanged(bool),
    /// A script evaluation finished. The error side carries the engine's message.
    ScriptCompleted {
        id: ScriptId,
        result: Result<serde_json::Value, String>,
    },
}

/// Navigation status has changed.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    /// Triggered when navigation is initiated
    Start,
    /// Triggered when navigation recieves content and begins loading it
    Commit,
    /// Triggered when navigation is complete
    Finish,
    /// Triggered when navigation fails, either before or after commit
    Fail(String),
}

/// Convert an engine's fractional progress estimate into a whole percentage.
pub fn progress_percent(estimate: f64) -> i32 {
    if estimate.is_nan() {
        return 0;
    }
    (estimate * 100.0).round().max(0.0).min(100.0) as i32
}

/// A recipient for engine events.
pub trait EventHandler: 'static {
    fn handle_event(&mut self, event: Event);
}

impl<T: From<Event>> EventHandler for winit::event_loop::EventLoopProxy<T> {
    fn handle_event(&mut self, event: Event) {
        winit::event_loop::EventLoopProxy::<T>::send_event(self, T::from(event)).ok();
    }
}

impl<T> EventHandler for T where T: 'static + FnMut(Event) {
    fn handle_event(&mut self, event: Event) {
        (self)(event)
    }
}

impl EventHandler for mpsc::Sender<Event> {
    fn handle_event(&mut self, event: Event) {
        self.send(event).ok();
    }
}
