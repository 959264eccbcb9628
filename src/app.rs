use std::rc::Rc;

use adw::prelude::*;
use bus::capability::{ThemeSync, ToastPresenter};
use bus::payload::{ConnectionEvent, ShowToastPayload, ThemeUpdatePayload};
use bus::{Capabilities, Dispatcher, Emitter};
use gtk::glib;
use tracing::{debug, error, info};
use webkit6::prelude::*;

use crate::config::Config;
use crate::devices;
use crate::ipc::WebViewSink;
use crate::state::ShellHandle;

const APP_ID: &str = "org.casa.shell";
const APP_TITLE: &str = "Casa";

pub fn run(config: Config) -> glib::ExitCode {
    let app = adw::Application::builder().application_id(APP_ID).build();
    let config = Rc::new(config);
    app.connect_activate(move |app| build_ui(app, &config));
    // Arguments were already parsed by clap.
    app.run_with_args::<&str>(&[])
}

/// Follows dashboard theme changes with the adwaita color scheme.
struct AdwTheme {
    shell: ShellHandle,
}

impl ThemeSync for AdwTheme {
    fn apply(&self, theme: &ThemeUpdatePayload) {
        self.shell.apply(theme);
        let scheme = if theme.dark_mode {
            adw::ColorScheme::ForceDark
        } else {
            adw::ColorScheme::Default
        };
        adw::StyleManager::default().set_color_scheme(scheme);
    }
}

/// Schedules auto-dismiss for toasts that carry a duration.
struct TimedToasts {
    shell: ShellHandle,
}

impl ToastPresenter for TimedToasts {
    fn show(&self, toast: &ShowToastPayload) {
        self.shell.show(toast);
        if let Some(delay) = toast.auto_dismiss() {
            let shell = self.shell.clone();
            let id = toast.id.clone();
            glib::timeout_add_local_once(delay, move || shell.hide(&id));
        }
    }

    fn hide(&self, id: &str) {
        self.shell.hide(id);
    }
}

fn build_ui(app: &adw::Application, config: &Config) {
    let style_manager = adw::StyleManager::default();
    style_manager.set_color_scheme(adw::ColorScheme::Default);

    let manager = webkit6::UserContentManager::new();
    if !manager.register_script_message_handler(&config.shell.message_handler, None) {
        error!(
            handler = %config.shell.message_handler,
            "failed to register script message handler"
        );
    }

    let settings = webkit6::Settings::builder()
        .enable_javascript(true)
        .build();
    let webview = webkit6::WebView::builder()
        .settings(&settings)
        .user_content_manager(&manager)
        .build();
    webview.set_hexpand(true);
    webview.set_vexpand(true);

    let sink = Rc::new(WebViewSink::new(webview.clone()));
    let emitter = Emitter::with_receiver(sink, &config.shell.script_receiver);
    let shell = ShellHandle::new(emitter.clone());
    let capabilities = Capabilities {
        theme: Rc::new(AdwTheme {
            shell: shell.clone(),
        }),
        toasts: Rc::new(TimedToasts {
            shell: shell.clone(),
        }),
        ..devices::capabilities(&shell)
    };
    let dispatcher = Dispatcher::new(capabilities, emitter, config.capabilities.clone());

    manager.connect_script_message_received(
        Some(&config.shell.message_handler),
        move |_, value| {
            let raw = if value.is_string() {
                value.to_str().to_string()
            } else {
                match value.to_json(0) {
                    Some(json) => json.to_string(),
                    None => {
                        error!("external message could not be converted to JSON");
                        return;
                    }
                }
            };
            let outcome = dispatcher.dispatch_raw(&raw);
            debug!(?outcome, "dispatched external message");
        },
    );

    let shell_for_failure = shell.clone();
    webview.connect_load_failed(move |_, _event, uri, err| {
        error!(uri, "dashboard failed to load: {err}");
        shell_for_failure.report_connection(ConnectionEvent::Disconnected);
        false
    });

    let shell_for_scheme = shell.clone();
    style_manager.connect_dark_notify(move |manager| {
        let theme = ThemeUpdatePayload {
            dark_mode: manager.is_dark(),
            ..shell_for_scheme.state().theme.clone()
        };
        shell_for_scheme.push_theme(theme);
    });

    let header = adw::HeaderBar::new();
    header.set_show_start_title_buttons(true);
    header.set_show_end_title_buttons(true);

    let content = gtk::Box::new(gtk::Orientation::Vertical, 0);
    content.append(&header);
    content.append(&webview);

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title(APP_TITLE)
        .default_width(1280)
        .default_height(800)
        .content(&content)
        .build();
    window.present();

    info!(dashboard = %config.shell.dashboard_url, "loading dashboard");
    webview.load_uri(&config.shell.dashboard_url);
}
