//! Application - App Initialization and Window Management
//!
//! Main entry point for the GPUI application.

use gpui::{
    App, AppContext, Application, Bounds, KeyBinding, SharedString, TitlebarOptions, WindowBounds,
    WindowOptions, actions, px,
};

use crate::constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};
use crate::domain::CollectionInfo;
use crate::services::{ServiceHub, spawn_named_in_tokio};
use crate::states::TableState;
use crate::viewport::ViewportController;
use crate::views::TableView;

actions!(rowscope, [Quit]);

/// Run the Rowscope application
///
/// The viewport controller is started on the tokio runtime before the window
/// opens; the window's state entity talks to it through its handle.
pub fn run_app(hub: ServiceHub, collection: Option<String>, collections: Vec<CollectionInfo>) {
    Application::new().run(move |cx: &mut App| {
        // Set up action handlers
        cx.on_action(|_: &Quit, cx: &mut App| cx.quit());
        cx.bind_keys([
            KeyBinding::new("cmd-q", Quit, None),
            KeyBinding::new("ctrl-q", Quit, None),
        ]);

        // Quit the app when all windows are closed
        cx.on_window_closed(|cx| {
            if cx.windows().is_empty() {
                cx.quit();
            }
        })
        .detach();

        let config = hub.config().clone();
        let (controller, handle) =
            ViewportController::new(&config, hub.client(), collection.map(Into::into));
        spawn_named_in_tokio("viewport-controller", controller.run());

        cx.set_global(hub);

        // Create main window
        let bounds = Bounds::centered(
            None,
            gpui::size(px(DEFAULT_WINDOW_WIDTH), px(DEFAULT_WINDOW_HEIGHT)),
            cx,
        );
        let window_options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            titlebar: Some(TitlebarOptions {
                title: Some(SharedString::from("Rowscope")),
                ..Default::default()
            }),
            ..Default::default()
        };

        let opened = cx.open_window(window_options, |_window, cx| {
            let state = cx.new(|cx| TableState::new(handle, &config, cx));
            cx.new(|cx| TableView::new(state, collections, cx))
        });
        if let Err(e) = opened {
            tracing::error!("Failed to open main window: {e:#}");
            cx.quit();
            return;
        }

        cx.activate(true);
    });
}
