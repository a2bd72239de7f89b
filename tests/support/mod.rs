//! A scriptable stand-in for a native web view.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;

use winit_wkwebview::{
    Bounds, Engine, Error, Event, EventHandler, NavigationEvent, Result, ScriptId, WebViewWidget,
    WebViewWidgetBuilder,
};

/// A command the widget sent to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    LoadUrl(String),
    LoadHtml(String, Option<String>),
    GoBack,
    GoForward,
    Stop,
    Reload,
    Evaluate(String, ScriptId),
    Attach,
    SetBounds(Bounds),
    SetHidden(bool),
}

#[derive(Debug)]
pub struct FakeState {
    pub calls: Vec<Call>,
    pub history: Vec<String>,
    pub position: Option<usize>,
    pub title: Option<String>,
    pub loading: bool,
    pub hidden: bool,
    pub fail_attach: bool,
    pub drops: u32,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            history: Vec::new(),
            position: None,
            title: None,
            loading: false,
            hidden: true,
            fail_attach: false,
            drops: 0,
        }
    }
}

impl FakeState {
    fn current(&self) -> Option<String> {
        self.position.map(|index| self.history[index].clone())
    }

    fn can_go_back(&self) -> bool {
        matches!(self.position, Some(index) if index > 0)
    }

    fn can_go_forward(&self) -> bool {
        matches!(self.position, Some(index) if index + 1 < self.history.len())
    }

    /// Bounds the engine was given, oldest first
    pub fn bounds(&self) -> Vec<Bounds> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::SetBounds(bounds) => Some(*bounds),
                _ => None,
            })
            .collect()
    }

    pub fn navigation_calls(&self) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    Call::LoadUrl(_) | Call::LoadHtml(..) | Call::GoBack | Call::GoForward | Call::Reload
                )
            })
            .cloned()
            .collect()
    }
}

/// Engine double: records every command and reports navigations through a channel.
pub struct FakeEngine {
    state: Rc<RefCell<FakeState>>,
    events: Box<dyn EventHandler>,
}

/// The test's side of a [`FakeEngine`]: inspects its state and plays the native control's part.
pub struct Remote {
    pub state: Rc<RefCell<FakeState>>,
    sender: mpsc::Sender<Event>,
    receiver: mpsc::Receiver<Event>,
}

pub fn fake_engine() -> (FakeEngine, Remote) {
    let state = Rc::new(RefCell::new(FakeState::default()));
    let (sender, receiver) = mpsc::channel();
    let engine = FakeEngine {
        state: Rc::clone(&state),
        events: Box::new(sender.clone()),
    };
    (
        engine,
        Remote {
            state,
            sender,
            receiver,
        },
    )
}

pub fn fake_widget(builder: WebViewWidgetBuilder) -> (WebViewWidget<FakeEngine>, Remote) {
    let (engine, remote) = fake_engine();
    (builder.build_with_engine(engine), remote)
}

impl FakeEngine {
    fn report(&mut self, event: Event) {
        self.events.handle_event(event);
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn start(&mut self, url: String) {
        self.state.borrow_mut().loading = true;
        self.report(Event::Navigation(NavigationEvent::Start));
        self.report(Event::UrlChanged(Some(url)));
    }
}

impl Engine for FakeEngine {
    fn load_url(&mut self, url: &str) {
        self.record(Call::LoadUrl(url.to_owned()));
        {
            let mut state = self.state.borrow_mut();
            let keep = state.position.map_or(0, |index| index + 1);
            state.history.truncate(keep);
            state.history.push(url.to_owned());
            let last = state.history.len() - 1;
            state.position = Some(last);
        }
        self.start(url.to_owned());
    }

    fn load_html(&mut self, html: &str, base_url: Option<&str>) {
        self.record(Call::LoadHtml(html.to_owned(), base_url.map(str::to_owned)));
        let url = base_url.unwrap_or("about:blank").to_owned();
        {
            let mut state = self.state.borrow_mut();
            state.history.push(url.clone());
            let last = state.history.len() - 1;
            state.position = Some(last);
        }
        self.start(url);
    }

    fn go_back(&mut self) {
        self.record(Call::GoBack);
        let url = {
            let mut state = self.state.borrow_mut();
            let index = state.position.expect("go_back without history") - 1;
            state.position = Some(index);
            state.history[index].clone()
        };
        self.start(url);
    }

    fn go_forward(&mut self) {
        self.record(Call::GoForward);
        let url = {
            let mut state = self.state.borrow_mut();
            let index = state.position.expect("go_forward without history") + 1;
            state.position = Some(index);
            state.history[index].clone()
        };
        self.start(url);
    }

    fn stop_loading(&mut self) {
        self.record(Call::Stop);
        self.state.borrow_mut().loading = false;
    }

    fn reload(&mut self) {
        self.record(Call::Reload);
        let url = self.state.borrow().current();
        if let Some(url) = url {
            self.start(url);
        }
    }

    fn evaluate_script(&mut self, script: &str, id: ScriptId) {
        self.record(Call::Evaluate(script.to_owned(), id));
    }

    fn url(&self) -> Option<String> {
        self.state.borrow().current()
    }

    fn title(&self) -> Option<String> {
        self.state.borrow().title.clone()
    }

    fn can_go_back(&self) -> bool {
        self.state.borrow().can_go_back()
    }

    fn can_go_forward(&self) -> bool {
        self.state.borrow().can_go_forward()
    }

    fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    fn attach(&mut self) -> Result<()> {
        self.record(Call::Attach);
        if self.state.borrow().fail_attach {
            return Err(Error::ParentDetached);
        }
        Ok(())
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        self.record(Call::SetBounds(bounds));
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.record(Call::SetHidden(hidden));
        self.state.borrow_mut().hidden = hidden;
    }
}

impl Drop for FakeEngine {
    fn drop(&mut self) {
        self.state.borrow_mut().drops += 1;
    }
}

impl Remote {
    /// Report an event as if the native control had produced it
    pub fn report(&self, event: Event) {
        self.sender.send(event).ok();
    }

    /// Finish the current navigation, updating history availability like the native control
    pub fn finish(&self, ok: bool) {
        let (back, forward) = {
            let mut state = self.state.borrow_mut();
            state.loading = false;
            (state.can_go_back(), state.can_go_forward())
        };
        self.report(Event::ProgressChanged(1.0));
        if ok {
            self.report(Event::Navigation(NavigationEvent::Finish));
        } else {
            self.report(Event::Navigation(NavigationEvent::Fail(String::from("net error"))));
        }
        self.report(Event::CanGoBackChanged(back));
        self.report(Event::CanGoForwardChanged(forward));
    }

    pub fn complete_script(&self, id: ScriptId, result: std::result::Result<serde_json::Value, String>) {
        self.report(Event::ScriptCompleted { id, result });
    }

    pub fn pending(&self) -> Vec<Event> {
        self.receiver.try_iter().collect()
    }

    /// Hand every reported event to the widget, as an application's event loop would
    pub fn pump<E: Engine>(&self, widget: &mut WebViewWidget<E>) -> usize {
        let events: Vec<Event> = self.receiver.try_iter().collect();
        let count = events.len();
        for event in events {
            widget.dispatch(event);
        }
        count
    }

    pub fn script_ids(&self) -> Vec<ScriptId> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Evaluate(_, id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

/// What a widget emitted, in emission order
#[derive(Debug, Clone, PartialEq)]
pub enum Emitted {
    LoadStarted,
    LoadFinished(bool),
    UrlChanged(url::Url),
    TitleChanged(String),
    LoadProgress(i32),
    CanGoBack(bool),
    CanGoForward(bool),
}

/// Connect to every signal of `widget` and collect the emissions
pub fn record_signals<E: Engine>(widget: &mut WebViewWidget<E>) -> Rc<RefCell<Vec<Emitted>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let signals = widget.signals();

    let sink = Rc::clone(&log);
    signals
        .load_started
        .connect(move |_| sink.borrow_mut().push(Emitted::LoadStarted));
    let sink = Rc::clone(&log);
    signals
        .load_finished
        .connect(move |ok| sink.borrow_mut().push(Emitted::LoadFinished(*ok)));
    let sink = Rc::clone(&log);
    signals
        .url_changed
        .connect(move |url| sink.borrow_mut().push(Emitted::UrlChanged(url.clone())));
    let sink = Rc::clone(&log);
    signals
        .title_changed
        .connect(move |title| sink.borrow_mut().push(Emitted::TitleChanged(title.clone())));
    let sink = Rc::clone(&log);
    signals
        .load_progress
        .connect(move |percent| sink.borrow_mut().push(Emitted::LoadProgress(*percent)));
    let sink = Rc::clone(&log);
    signals
        .can_go_back_changed
        .connect(move |can| sink.borrow_mut().push(Emitted::CanGoBack(*can)));
    let sink = Rc::clone(&log);
    signals
        .can_go_forward_changed
        .connect(move |can| sink.borrow_mut().push(Emitted::CanGoForward(*can)));

    log
}
