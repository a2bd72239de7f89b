//! The seam between the widget and a native web-rendering control.

use crate::error::Result;
use crate::events::ScriptId;
use crate::geometry::Bounds;

/// A native web-rendering control.
///
/// Commands return immediately. Their outcome is reported later, as
/// [`Event`](crate::Event)s sent to the [`EventHandler`](crate::EventHandler)
/// the engine was created with. Queries read the control's live state.
///
/// Every call to `load_url`, `load_html`, `go_back`, `go_forward` and
/// `reload` is reported with exactly one `NavigationEvent::Start`, even when
/// the navigation fails at once.
///
/// Dropping the engine destroys the native control.
pub trait Engine {
    fn load_url(&mut self, url: &str);

    fn load_html(&mut self, html: &str, base_url: Option<&str>);

    fn go_back(&mut self);

    fn go_forward(&mut self);

    fn stop_loading(&mut self);

    fn reload(&mut self);

    /// Run `script` in the page. The result must be reported as
    /// `Event::ScriptCompleted` carrying `id`.
    fn evaluate_script(&mut self, script: &str, id: ScriptId);

    /// The current location, `None` before anything has been loaded
    fn url(&self) -> Option<String>;

    fn title(&self) -> Option<String>;

    fn can_go_back(&self) -> bool;

    fn can_go_forward(&self) -> bool;

    fn is_loading(&self) -> bool;

    /// Insert the control into its parent. Called once, before the first `set_bounds`.
    fn attach(&mut self) -> Result<()>;

    /// Place the control within its parent
    fn set_bounds(&mut self, bounds: Bounds);

    fn set_hidden(&mut self, hidden: bool);
}
