use objc::rc::StrongPtr;

use crate::*;

pub trait WebViewWidgetExtMacOS {
    /// Get a strong pointer to the internal WKWebView object
    fn wk_web_view(&self) -> StrongPtr;
}

impl WebViewWidgetExtMacOS for WebViewWidget {
    fn wk_web_view(&self) -> StrongPtr {
        self.engine().web_view.clone()
    }
}

pub trait WebViewWidgetBuilderExtMacOS {
    /// Enable the Web Inspector on the web view
    fn with_debug(self, enable: bool) -> Self;
}

impl WebViewWidgetBuilderExtMacOS for WebViewWidgetBuilder {
    fn with_debug(mut self, enable: bool) -> Self {
        self.platform.enable_debug = enable;
        self
    }
}
