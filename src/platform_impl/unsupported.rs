use tracing::warn;
use winit::window::Window;

use crate::*;

#[derive(Debug, Default)]
pub struct PlatformWebViewBuilder;

/// Stand-in for platforms without a native web view. It cannot be constructed.
#[derive(Debug)]
pub enum PlatformEngine {}

impl PlatformEngine {
    pub fn new(
        _config: &WebViewConfig,
        _builder: &PlatformWebViewBuilder,
        _event_handler: impl EventHandler,
        _parent: Option<&Window>,
    ) -> Result<Self> {
        warn!("no native web view on this platform");
        Err(Error::Unsupported)
    }
}

impl Engine for PlatformEngine {
    fn load_url(&mut self, _url: &str) {
        match *self {}
    }

    fn load_html(&mut self, _html: &str, _base_url: Option<&str>) {
        match *self {}
    }

    fn go_back(&mut self) {
        match *self {}
    }

    fn go_forward(&mut self) {
        match *self {}
    }

    fn stop_loading(&mut self) {
        match *self {}
    }

    fn reload(&mut self) {
        match *self {}
    }

    fn evaluate_script(&mut self, _script: &str, _id: ScriptId) {
        match *self {}
    }

    fn url(&self) -> Option<String> {
        match *self {}
    }

    fn title(&self) -> Option<String> {
        match *self {}
    }

    fn can_go_back(&self) -> bool {
        match *self {}
    }

    fn can_go_forward(&self) -> bool {
        match *self {}
    }

    fn is_loading(&self) -> bool {
        match *self {}
    }

    fn attach(&mut self) -> Result<()> {
        match *self {}
    }

    fn set_bounds(&mut self, _bounds: Bounds) {
        match *self {}
    }

    fn set_hidden(&mut self, _hidden: bool) {
        match *self {}
    }
}
