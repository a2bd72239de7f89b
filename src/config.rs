//! Web view configuration

/// Settings applied when the native web view is created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebViewConfig {
    /// URL to load right after construction (takes precedence over `html`)
    pub url: Option<String>,
    /// HTML to render right after construction
    pub html: Option<String>,
    /// Scripts injected into every frame at document start
    pub init_scripts: Vec<String>,
    /// Custom user agent string
    pub user_agent: Option<String>,
}

impl WebViewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a URL once the web view exists
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Render inline HTML once the web view exists
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Add a script to be injected into the page when it loads
    pub fn init_script(mut self, script: impl AsRef<str>) -> Self {
        self.init_scripts.push(script.as_ref().to_owned());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
