extern crate winit;
extern crate winit_wkwebview;

use std::rc::Rc;

use tracing::info;
use tracing_subscriber::EnvFilter;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    platform::run_return::EventLoopExtRunReturn,
    window::WindowBuilder,
};
use winit_wkwebview as webview;

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let target = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("https://www.rust-lang.org/"));

    let mut event_loop = EventLoop::<webview::Event>::with_user_event();

    let window = Rc::new(
        WindowBuilder::new()
            .with_inner_size(winit::dpi::LogicalSize::new(1200.0, 800.0))
            .build(&event_loop)
            .unwrap(),
    );

    let mut web_view = match webview::WebViewWidgetBuilder::new()
        .build(event_loop.create_proxy(), Some(&*window))
    {
        Ok(web_view) => web_view,
        Err(error) => {
            eprintln!("cannot create web view: {}", error);
            return;
        }
    };

    let title_window = Rc::clone(&window);
    web_view
        .signals()
        .title_changed
        .connect(move |title| title_window.set_title(title));
    web_view
        .signals()
        .load_progress
        .connect(|percent| info!(percent, "progress"));
    web_view
        .signals()
        .load_finished
        .connect(|ok| info!(ok, "load finished"));

    web_view.load(&target);
    web_view.show().unwrap();

    event_loop.run_return(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                window_id,
            } if window_id == window.id() => *control_flow = ControlFlow::Exit,
            Event::WindowEvent { event, window_id } if window_id == window.id() => {
                web_view.handle_window_event(&event)
            }
            Event::UserEvent(event) => web_view.dispatch(event),
            _ => (),
        }
    });
}
