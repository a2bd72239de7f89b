use crate::*;
use block::ConcreteBlock;
use core_graphics::geometry::{CGPoint, CGRect, CGSize};
use objc::{
    rc::{StrongPtr, WeakPtr},
    runtime::{Class, Object, BOOL, NO, YES},
};
use objc_foundation::{INSData, INSString, NSData, NSString};
use std::{cell::RefCell, ffi::c_void, ptr, rc::Rc};
use tracing::{debug, warn};
use winit::{platform::macos::WindowExtMacOS, window::Window};

#[macro_use]
mod macros;

#[link(name = "WebKit", kind = "framework")]
extern "C" {}

/// WKWebView properties reported through key-value observation
const OBSERVED_KEYS: [&str; 5] = ["URL", "title", "estimatedProgress", "canGoBack", "canGoForward"];

const NS_KEY_VALUE_OBSERVING_OPTION_NEW: usize = 1;

/// `WKUserScriptInjectionTimeAtDocumentStart`
const INJECT_AT_DOCUMENT_START: isize = 0;

type SharedHandler = Rc<RefCell<dyn EventHandler>>;

#[derive(Debug, Default)]
pub struct PlatformWebViewBuilder {
    pub(crate) enable_debug: bool,
}

/// A `WKWebView` placed inside a winit window's content view.
pub struct PlatformEngine {
    pub(crate) web_view: StrongPtr,
    delegate: StrongPtr,
    parent: Option<WeakPtr>,
    handler: SharedHandler,
}

impl PlatformEngine {
    pub fn new(
        config: &WebViewConfig,
        builder: &PlatformWebViewBuilder,
        event_handler: impl EventHandler,
        parent: Option<&Window>,
    ) -> Result<Self> {
        let web_view_class = Class::get("WKWebView").ok_or(Error::Unsupported)?;
        let handler: SharedHandler = Rc::new(RefCell::new(event_handler));

        unsafe {
            let delegate = StrongPtr::new(WebViewDelegate::new(Rc::clone(&handler)));

            let wk_config: *mut Object = msg_send![class!(WKWebViewConfiguration), new];

            // Enable developer tools if requested
            if builder.enable_debug {
                let preferences: *mut Object = msg_send![wk_config, preferences];
                let number: *mut Object = msg_send![class!(NSNumber), numberWithBool: YES];
                let key = NSString::from_str("developerExtrasEnabled");
                let _: () = msg_send![preferences, setValue: number forKey: &*key];
            }

            let manager: *mut Object = msg_send![wk_config, userContentController];
            for script in &config.init_scripts {
                let source = NSString::from_str(script);
                let wk_script: *mut Object = msg_send![class!(WKUserScript), alloc];
                let wk_script: *mut Object = msg_send![wk_script, initWithSource: &*source injectionTime: INJECT_AT_DOCUMENT_START forMainFrameOnly: NO];
                let _: () = msg_send![manager, addUserScript: wk_script];
                let _: () = msg_send![wk_script, release];
            }

            let frame = CGRect::new(&CGPoint::new(0.0, 0.0), &CGSize::new(0.0, 0.0));
            let web_view: *mut Object = msg_send![web_view_class, alloc];
            let web_view: *mut Object =
                msg_send![web_view, initWithFrame: frame configuration: wk_config];
            let _: () = msg_send![wk_config, release];
            if web_view.is_null() {
                return Err(Error::Unsupported);
            }
            let web_view = StrongPtr::new(web_view);

            let _: () = msg_send![*web_view, setHidden: YES];
            if let Some(user_agent) = &config.user_agent {
                let user_agent = NSString::from_str(user_agent);
                let _: () = msg_send![*web_view, setCustomUserAgent: &*user_agent];
            }

            let _: () = msg_send![*web_view, setNavigationDelegate: *delegate];
            for key in OBSERVED_KEYS.iter() {
                let key = NSString::from_str(key);
                let _: () = msg_send![*web_view, addObserver: *delegate forKeyPath: &*key options: NS_KEY_VALUE_OBSERVING_OPTION_NEW context: ptr::null_mut::<c_void>()];
            }

            let parent = parent.map(|window| WeakPtr::new(window.ns_view() as *mut Object));
            debug!(has_parent = parent.is_some(), "created WKWebView");

            Ok(PlatformEngine {
                web_view,
                delegate,
                parent,
                handler,
            })
        }
    }
}

impl Engine for PlatformEngine {
    fn load_url(&mut self, url: &str) {
        unsafe {
            let url = NSString::from_str(url);
            let url: *mut Object = msg_send![class!(NSURL), URLWithString: &*url];
            if url.is_null() {
                send(&self.handler, Event::Navigation(NavigationEvent::Start));
                send(
                    &self.handler,
                    Event::Navigation(NavigationEvent::Fail(String::from("malformed URL"))),
                );
                return;
            }

            let request: *mut Object = msg_send![class!(NSURLRequest), alloc];
            let request: *mut Object = msg_send![request, initWithURL: url];
            let _: *mut Object = msg_send![*self.web_view, loadRequest: request];
            let _: () = msg_send![request, release];
        }
    }

    fn load_html(&mut self, html: &str, base_url: Option<&str>) {
        unsafe {
            let html = NSString::from_str(html);
            let base_url: *mut Object = match base_url {
                Some(base_url) => {
                    let base_url = NSString::from_str(base_url);
                    msg_send![class!(NSURL), URLWithString: &*base_url]
                }
                None => ptr::null_mut(),
            };

            let _: *mut Object = msg_send![*self.web_view, loadHTMLString: &*html baseURL: base_url];
        }
    }

    fn go_back(&mut self) {
        unsafe {
            let _: *mut Object = msg_send![*self.web_view, goBack];
        }
    }

    fn go_forward(&mut self) {
        unsafe {
            let _: *mut Object = msg_send![*self.web_view, goForward];
        }
    }

    fn stop_loading(&mut self) {
        unsafe {
            let _: () = msg_send![*self.web_view, stopLoading];
        }
    }

    fn reload(&mut self) {
        unsafe {
            let _: *mut Object = msg_send![*self.web_view, reload];
        }
    }

    fn evaluate_script(&mut self, script: &str, id: ScriptId) {
        let handler = Rc::clone(&self.handler);
        let block = ConcreteBlock::new(move |value: *mut Object, error: *mut Object| {
            let result = unsafe { script_result(value, error) };
            send(&handler, Event::ScriptCompleted { id, result });
        });
        let block = block.copy();

        unsafe {
            let script = NSString::from_str(script);
            let _: () = msg_send![*self.web_view, evaluateJavaScript: &*script completionHandler: &*block];
        }
    }

    fn url(&self) -> Option<String> {
        unsafe {
            let url: *mut Object = msg_send![*self.web_view, URL];
            absolute_string(url)
        }
    }

    fn title(&self) -> Option<String> {
        unsafe { title_of(*self.web_view) }
    }

    fn can_go_back(&self) -> bool {
        unsafe {
            let can: BOOL = msg_send![*self.web_view, canGoBack];
            can != NO
        }
    }

    fn can_go_forward(&self) -> bool {
        unsafe {
            let can: BOOL = msg_send![*self.web_view, canGoForward];
            can != NO
        }
    }

    fn is_loading(&self) -> bool {
        unsafe {
            let loading: BOOL = msg_send![*self.web_view, isLoading];
            loading != NO
        }
    }

    fn attach(&mut self) -> Result<()> {
        let parent = self.parent.as_ref().ok_or(Error::NoParent)?;
        let view = parent.load();
        if view.is_null() {
            return Err(Error::ParentDetached);
        }

        unsafe {
            let _: () = msg_send![*view, addSubview: *self.web_view];
        }
        Ok(())
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        unsafe {
            let superview: *mut Object = msg_send![*self.web_view, superview];
            let y = if superview.is_null() {
                bounds.position.y
            } else {
                let flipped: BOOL = msg_send![superview, isFlipped];
                if flipped != NO {
                    bounds.position.y
                } else {
                    let parent_bounds: CGRect = msg_send![superview, bounds];
                    bounds.flipped_y(parent_bounds.size.height)
                }
            };

            let frame = CGRect::new(
                &CGPoint::new(bounds.position.x, y),
                &CGSize::new(bounds.size.width, bounds.size.height),
            );
            let _: () = msg_send![*self.web_view, setFrame: frame];
        }
    }

    fn set_hidden(&mut self, hidden: bool) {
        unsafe {
            let _: () = msg_send![*self.web_view, setHidden: if hidden { YES } else { NO }];
        }
    }
}

impl Drop for PlatformEngine {
    fn drop(&mut self) {
        unsafe {
            for key in OBSERVED_KEYS.iter() {
                let key = NSString::from_str(key);
                let _: () = msg_send![*self.web_view, removeObserver: *self.delegate forKeyPath: &*key];
            }
            let _: () = msg_send![*self.web_view, setNavigationDelegate: ptr::null_mut::<Object>()];
            let _: () = msg_send![*self.web_view, removeFromSuperview];
        }
        debug!("destroyed WKWebView");
    }
}

/// Pass an event to the application, unless its handler is already running
fn send(handler: &SharedHandler, event: Event) {
    match handler.try_borrow_mut() {
        Ok(mut handler) => handler.handle_event(event),
        Err(_) => warn!(?event, "event handler is busy, dropping event"),
    }
}

unsafe fn shared_handler(this: &Object) -> &SharedHandler {
    let handler: *mut c_void = *this.get_ivar("event_handler");
    &*(handler as *const SharedHandler)
}

unsafe fn string_of(string: *mut Object) -> Option<String> {
    (string as *const NSString)
        .as_ref()
        .map(|string| string.as_str().to_owned())
}

unsafe fn absolute_string(url: *mut Object) -> Option<String> {
    if url.is_null() {
        return None;
    }
    let string: *mut Object = msg_send![url, absoluteString];
    string_of(string).filter(|url| !url.is_empty())
}

unsafe fn title_of(web_view: *mut Object) -> Option<String> {
    let title: *mut Object = msg_send![web_view, title];
    string_of(title).filter(|title| !title.is_empty())
}

unsafe fn error_description(error: *mut Object) -> String {
    if error.is_null() {
        return String::from("unknown error");
    }
    let description: *mut Object = msg_send![error, localizedDescription];
    string_of(description).unwrap_or_else(|| String::from("unknown error"))
}

/// Convert a script completion into JSON. The value is wrapped in an array so
/// that bare strings and numbers pass `isValidJSONObject:`.
unsafe fn script_result(
    value: *mut Object,
    error: *mut Object,
) -> std::result::Result<serde_json::Value, String> {
    if !error.is_null() {
        return Err(error_description(error));
    }
    if value.is_null() {
        return Ok(serde_json::Value::Null);
    }

    let wrapped: *mut Object = msg_send![class!(NSArray), arrayWithObject: value];
    let valid: BOOL = msg_send![class!(NSJSONSerialization), isValidJSONObject: wrapped];
    if valid == NO {
        let description: *mut Object = msg_send![value, description];
        return Ok(serde_json::Value::String(string_of(description).unwrap_or_default()));
    }

    let mut json_error: *mut Object = ptr::null_mut();
    let data: *mut Object = msg_send![class!(NSJSONSerialization), dataWithJSONObject: wrapped options: 0usize error: &mut json_error as *mut *mut Object];
    if data.is_null() {
        return Err(error_description(json_error));
    }

    let bytes = (*(data as *const NSData)).bytes();
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(serde_json::Value::Array(mut values)) if values.len() == 1 => Ok(values.remove(0)),
        Ok(other) => Err(format!("unexpected script result shape: {}", other)),
        Err(error) => Err(error.to_string()),
    }
}

def_class! {
    #[allow(dead_code)]
    class WebViewDelegate: NSObject, WKNavigationDelegate {
        ivar event_handler: *mut c_void;

        fn initWithHandler(this, event_handler: *mut c_void) -> *mut Object {
            unsafe {
                this.set_ivar("event_handler", event_handler);

                msg_send![this, init]
            }
        }

        fn dealloc(this) {
            unsafe {
                let event_handler = *this.get_ivar::<*mut c_void>("event_handler");
                drop(Box::from_raw(event_handler as *mut SharedHandler));

                let _: () = msg_send![super(this, class!(NSObject)), dealloc];
            }
        }

        fn webView(this, _web_view: *mut Object, didStartProvisionalNavigation _navigation: *mut Object) {
            let handler = unsafe { shared_handler(this) };
            send(handler, Event::Navigation(NavigationEvent::Start));
        }

        fn webView(this, _web_view: *mut Object, didCommitNavigation _navigation: *mut Object) {
            let handler = unsafe { shared_handler(this) };
            send(handler, Event::Navigation(NavigationEvent::Commit));
        }

        fn webView(this, _web_view: *mut Object, didFinishNavigation _navigation: *mut Object) {
            let handler = unsafe { shared_handler(this) };
            send(handler, Event::Navigation(NavigationEvent::Finish));
        }

        fn webView(this, _web_view: *mut Object, didFailNavigation _navigation: *mut Object, withError error: *mut Object) {
            let (handler, reason) = unsafe { (shared_handler(this), error_description(error)) };
            send(handler, Event::Navigation(NavigationEvent::Fail(reason)));
        }

        fn webView(this, _web_view: *mut Object, didFailProvisionalNavigation _navigation: *mut Object, withError error: *mut Object) {
            let (handler, reason) = unsafe { (shared_handler(this), error_description(error)) };
            send(handler, Event::Navigation(NavigationEvent::Fail(reason)));
        }

        fn observeValueForKeyPath(this, key_path: *mut Object, ofObject object: *mut Object, change _change: *mut Object, context _context: *mut c_void) {
            unsafe {
                let key = match string_of(key_path) {
                    Some(key) => key,
                    None => return,
                };

                let event = match key.as_str() {
                    "URL" => {
                        let url: *mut Object = msg_send![object, URL];
                        Event::UrlChanged(absolute_string(url))
                    }
                    "title" => Event::TitleChanged(title_of(object)),
                    "estimatedProgress" => {
                        let progress: f64 = msg_send![object, estimatedProgress];
                        Event::ProgressChanged(progress)
                    }
                    "canGoBack" => {
                        let can: BOOL = msg_send![object, canGoBack];
                        Event::CanGoBackChanged(can != NO)
                    }
                    "canGoForward" => {
                        let can: BOOL = msg_send![object, canGoForward];
                        Event::CanGoForwardChanged(can != NO)
                    }
                    _ => return,
                };

                send(shared_handler(this), event);
            }
        }
    }
}

impl WebViewDelegate {
    fn new(handler: SharedHandler) -> *mut Object {
        let handler = Box::into_raw(Box::new(handler));

        unsafe {
            let del: *mut Object = msg_send![Self::class(), alloc];
            let del: *mut Object = msg_send![del, initWithHandler: handler as *mut c_void];

            del
        }
    }
}
