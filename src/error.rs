//! Error types for the web view widget.

use thiserror::Error;

/// Result type alias for widget operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the widget or its native engine.
#[derive(Error, Debug)]
pub enum Error {
    /// No native web view exists for the target platform
    #[error("no native web view is available on this platform")]
    Unsupported,

    /// The widget was built without a parent window
    #[error("web view has no parent window to attach to")]
    NoParent,

    /// The parent window's view was destroyed before the web view could attach
    #[error("parent view was destroyed before the web view was attached")]
    ParentDetached,

    /// JavaScript evaluation failed inside the page
    #[error("JavaScript error: {0}")]
    Script(String),
}
