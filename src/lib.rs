//! A widget that hosts the platform's native web view inside a `winit` window.
//!
//! The widget forwards navigation commands to the native control and turns
//! the control's asynchronous reports into [`Signals`]:
//!
//! ```no_run
//! use winit::event_loop::EventLoop;
//! use winit::window::WindowBuilder;
//! use winit_wkwebview::{Event, WebViewWidgetBuilder};
//!
//! let event_loop = EventLoop::<Event>::with_user_event();
//! let window = WindowBuilder::new().build(&event_loop).unwrap();
//!
//! let mut web_view = WebViewWidgetBuilder::new()
//!     .build(event_loop.create_proxy(), Some(&window))
//!     .unwrap();
//! web_view.signals().title_changed.connect(|title| println!("{}", title));
//! web_view.load("https://www.rust-lang.org/");
//! web_view.show().unwrap();
//! // Feed every `Event::UserEvent(event)` back through `web_view.dispatch(event)`.
//! ```

#[cfg(target_os = "macos")]
extern crate core_graphics;
#[cfg(target_os = "macos")]
extern crate objc_foundation;
#[cfg(target_os = "macos")]
#[macro_use]
extern crate objc;
#[cfg(target_os = "macos")]
extern crate block;

#[cfg(target_os = "macos")]
#[macro_use]
extern crate paste;
extern crate winit;

use std::collections::HashMap;

use tracing::{debug, trace, warn};
use url::Url;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::window::Window;

mod config;
mod engine;
mod error;
mod events;
mod geometry;
mod signal;

pub mod platform;
mod platform_impl;

pub use config::WebViewConfig;
pub use engine::Engine;
pub use error::{Error, Result};
pub use events::*;
pub use geometry::Bounds;
pub use platform_impl::PlatformEngine;
pub use signal::{Connection, Signal, Signals};

type ScriptCallback = Box<dyn FnOnce(Result<serde_json::Value>)>;

/// A builder for the web view widget.
#[derive(Debug, Default)]
pub struct WebViewWidgetBuilder {
    pub(crate) config: WebViewConfig,
    pub(crate) geometry: Option<Bounds>,
    pub(crate) platform: platform_impl::PlatformWebViewBuilder,
}

impl WebViewWidgetBuilder {
    /// Create a new WebViewWidgetBuilder
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: WebViewConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a script to be injected into the page when it loads
    pub fn with_init_script(mut self, script: impl AsRef<str>) -> Self {
        self.config = self.config.init_script(script);
        self
    }

    /// Load `url` as soon as the widget is built
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.config = self.config.url(url);
        self
    }

    /// Render `html` as soon as the widget is built
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.config = self.config.html(html);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config = self.config.user_agent(user_agent);
        self
    }

    /// Place the widget at fixed bounds instead of filling its parent
    pub fn with_geometry(mut self, bounds: Bounds) -> Self {
        self.geometry = Some(bounds);
        self
    }

    /// Construct the widget around the platform's native web view.
    ///
    /// `parent` is not owned by the widget. Events from the native control go
    /// to `event_handler`, and must be handed back to [`WebViewWidget::dispatch`].
    pub fn build(
        self,
        event_handler: impl EventHandler,
        parent: Option<&Window>,
    ) -> Result<WebViewWidget> {
        let engine = PlatformEngine::new(&self.config, &self.platform, event_handler, parent)?;
        let scale_factor = parent.map_or(1.0, |window| window.scale_factor());
        let parent_bounds = parent
            .map(|window| Bounds::filling_physical(window.inner_size(), scale_factor))
            .unwrap_or_default();

        Ok(WebViewWidget::new(
            engine,
            &self.config,
            self.geometry,
            parent_bounds,
            scale_factor,
        ))
    }

    /// Construct the widget around an existing engine
    pub fn build_with_engine<E: Engine>(self, engine: E) -> WebViewWidget<E> {
        WebViewWidget::new(engine, &self.config, self.geometry, Bounds::default(), 1.0)
    }
}

/// A target for navigation
#[derive(Debug, Clone, Copy)]
pub enum NavigationTarget<'a> {
    Url(&'a str),
    Html {
        html: &'a str,
        base_url: Option<&'a str>,
    },
}

/// A rectangular region of a window showing a native web view.
///
/// The widget owns its engine; dropping the widget destroys the native
/// control. Location, title and history are never cached here, every query
/// goes to the engine.
///
/// Listeners connected through [`signals`](Self::signals) run inside
/// [`dispatch`](Self::dispatch) and cannot call back into the widget.
pub struct WebViewWidget<E: Engine = PlatformEngine> {
    engine: E,
    signals: Signals,
    geometry: Bounds,
    fills_parent: bool,
    scale_factor: f64,
    attached: bool,
    visible: bool,
    progress_suppressed: bool,
    /// Navigation commands whose `Start` has not been dispatched yet
    unstarted_navigations: usize,
    /// `Start`s still queued from navigations that `stop` cancelled
    stale_starts: usize,
    next_script_id: u64,
    pending_scripts: HashMap<ScriptId, ScriptCallback>,
}

impl<E: Engine> WebViewWidget<E> {
    fn new(
        engine: E,
        config: &WebViewConfig,
        geometry: Option<Bounds>,
        parent_bounds: Bounds,
        scale_factor: f64,
    ) -> Self {
        let mut widget = Self {
            engine,
            signals: Signals::default(),
            geometry: geometry.unwrap_or(parent_bounds),
            fills_parent: geometry.is_none(),
            scale_factor,
            attached: false,
            visible: false,
            progress_suppressed: false,
            unstarted_navigations: 0,
            stale_starts: 0,
            next_script_id: 0,
            pending_scripts: HashMap::new(),
        };

        if let Some(url) = &config.url {
            widget.load(url);
        } else if let Some(html) = &config.html {
            widget.load_html(html, None);
        }

        widget
    }

    /// The notifications this widget emits
    pub fn signals(&mut self) -> &mut Signals {
        &mut self.signals
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn navigate(&mut self, target: NavigationTarget) {
        self.begin_navigation();
        match target {
            NavigationTarget::Url(url) => {
                debug!(url, "loading url");
                self.engine.load_url(url)
            }
            NavigationTarget::Html { html, base_url } => {
                debug!(len = html.len(), ?base_url, "loading html");
                self.engine.load_html(html, base_url)
            }
        }
    }

    /// Start loading `url`. The text is passed to the engine unchecked.
    pub fn load(&mut self, url: &str) {
        self.navigate(NavigationTarget::Url(url))
    }

    pub fn load_html(&mut self, html: &str, base_url: Option<&str>) {
        self.navigate(NavigationTarget::Html { html, base_url })
    }

    /// The engine's current location, `None` until something has been loaded
    pub fn url(&self) -> Option<Url> {
        self.engine.url().and_then(|url| Url::parse(&url).ok())
    }

    pub fn set_url(&mut self, url: &Url) {
        self.load(url.as_str())
    }

    pub fn title(&self) -> Option<String> {
        self.engine.title()
    }

    pub fn can_go_back(&self) -> bool {
        self.engine.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.engine.can_go_forward()
    }

    pub fn is_loading(&self) -> bool {
        self.engine.is_loading()
    }

    /// Go one entry back in history. Does nothing when there is none.
    pub fn back(&mut self) {
        if !self.engine.can_go_back() {
            trace!("no history to go back to");
            return;
        }
        debug!("going back");
        self.begin_navigation();
        self.engine.go_back();
    }

    /// Go one entry forward in history. Does nothing when there is none.
    pub fn forward(&mut self) {
        if !self.engine.can_go_forward() {
            trace!("no history to go forward to");
            return;
        }
        debug!("going forward");
        self.begin_navigation();
        self.engine.go_forward();
    }

    /// Cancel the navigation in flight. No progress is reported after this
    /// until another navigation starts. `Start`s already reported for the
    /// cancelled navigations do not count as new ones.
    pub fn stop(&mut self) {
        debug!(stale_starts = self.unstarted_navigations, "stopping");
        self.progress_suppressed = true;
        self.stale_starts = self.unstarted_navigations;
        self.engine.stop_loading();
    }

    /// Load the current location again. Does nothing before the first load.
    pub fn reload(&mut self) {
        if self.engine.url().is_none() {
            trace!("nothing to reload");
            return;
        }
        debug!("reloading");
        self.begin_navigation();
        self.engine.reload();
    }

    fn begin_navigation(&mut self) {
        self.progress_suppressed = false;
        self.unstarted_navigations += 1;
    }

    /// Run a script in the page and ignore its outcome
    pub fn evaluate_javascript(&mut self, script: impl AsRef<str>) {
        let id = self.next_script_id();
        self.engine.evaluate_script(script.as_ref(), id);
    }

    /// Run a script in the page. `callback` receives the script's value, or
    /// the page's error, once the engine reports back.
    pub fn evaluate_javascript_with<F>(&mut self, script: impl AsRef<str>, callback: F)
    where
        F: FnOnce(Result<serde_json::Value>) + 'static,
    {
        let id = self.next_script_id();
        self.pending_scripts.insert(id, Box::new(callback));
        self.engine.evaluate_script(script.as_ref(), id);
    }

    fn next_script_id(&mut self) -> ScriptId {
        let id = ScriptId(self.next_script_id);
        self.next_script_id += 1;
        id
    }

    /// Make the widget visible. The first call attaches the native control
    /// to the parent and places it at the widget's bounds.
    pub fn show(&mut self) -> Result<()> {
        if !self.attached {
            self.engine.attach()?;
            self.attached = true;
            debug!(bounds = ?self.geometry, "attached native web view");
            self.engine.set_bounds(self.geometry);
        }
        if !self.visible {
            self.engine.set_hidden(false);
            self.visible = true;
        }
        Ok(())
    }

    pub fn hide(&mut self) {
        if self.visible {
            self.engine.set_hidden(true);
            self.visible = false;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn geometry(&self) -> Bounds {
        self.geometry
    }

    /// Place the widget at fixed bounds within its parent. The widget stops
    /// following the parent's size.
    pub fn set_geometry(&mut self, bounds: Bounds) {
        self.fills_parent = false;
        self.apply_geometry(bounds);
    }

    pub fn resize(&mut self, size: LogicalSize<f64>) {
        self.set_geometry(self.geometry.with_size(size));
    }

    /// Follow size changes of the parent window. Pass every `WindowEvent`
    /// of the parent here.
    pub fn handle_window_event(&mut self, event: &WindowEvent<'_>) {
        match event {
            WindowEvent::Resized(size) => {
                if self.fills_parent {
                    self.apply_geometry(Bounds::filling_physical(*size, self.scale_factor));
                }
            }
            WindowEvent::ScaleFactorChanged {
                scale_factor,
                new_inner_size,
            } => {
                self.scale_factor = *scale_factor;
                if self.fills_parent {
                    self.apply_geometry(Bounds::filling_physical(**new_inner_size, *scale_factor));
                }
            }
            _ => (),
        }
    }

    fn apply_geometry(&mut self, bounds: Bounds) {
        self.geometry = bounds;
        if self.attached {
            self.engine.set_bounds(bounds);
        }
    }

    /// Turn an engine event into signal emissions
    pub fn dispatch(&mut self, event: Event) {
        trace!(?event, "dispatching");
        match event {
            Event::Navigation(NavigationEvent::Start) => {
                self.unstarted_navigations = self.unstarted_navigations.saturating_sub(1);
                if self.stale_starts > 0 {
                    self.stale_starts -= 1;
                } else {
                    self.progress_suppressed = false;
                }
                self.signals.load_started.emit(&());
            }
            Event::Navigation(NavigationEvent::Commit) => (),
            Event::Navigation(NavigationEvent::Finish) => self.signals.load_finished.emit(&true),
            Event::Navigation(NavigationEvent::Fail(reason)) => {
                warn!(%reason, "navigation failed");
                self.signals.load_finished.emit(&false);
            }
            Event::UrlChanged(None) => (),
            Event::UrlChanged(Some(url)) => match Url::parse(&url) {
                Ok(url) => self.signals.url_changed.emit(&url),
                Err(error) => warn!(%url, %error, "engine reported an unparseable url"),
            },
            Event::TitleChanged(title) => {
                self.signals.title_changed.emit(&title.unwrap_or_default())
            }
            Event::ProgressChanged(estimate) => {
                if self.progress_suppressed {
                    trace!(estimate, "progress after stop, dropped");
                } else {
                    self.signals.load_progress.emit(&progress_percent(estimate));
                }
            }
            Event::CanGoBackChanged(can) => self.signals.can_go_back_changed.emit(&can),
            Event::CanGoForwardChanged(can) => self.signals.can_go_forward_changed.emit(&can),
            Event::ScriptCompleted { id, result } => match self.pending_scripts.remove(&id) {
                Some(callback) => callback(result.map_err(Error::Script)),
                None => {
                    if let Err(error) = result {
                        debug!(%error, "script failed");
                    }
                }
            },
        }
    }
}

impl<E: Engine> std::fmt::Debug for WebViewWidget<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebViewWidget")
            .field("geometry", &self.geometry)
            .field("attached", &self.attached)
            .field("visible", &self.visible)
            .field("pending_scripts", &self.pending_scripts.len())
            .finish()
    }
}
