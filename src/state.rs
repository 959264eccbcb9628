use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bus::capability::{BarcodeScanner, ShellUi, ThemeSync, ThreadCredentials, ToastPresenter};
use bus::payload::{
    AssistShowPayload, BarcodeScanPayload, ConnectionEvent, ConnectionStatusPayload,
    ShowToastPayload, ThemeUpdatePayload, ThreadKeychainPayload,
};
use bus::{Emitter, OutboundEvent, Responder};
use serde_json::json;
use tracing::{debug, info, warn};

/// Native screen presented above the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Settings,
    Assist {
        pipeline_id: Option<String>,
        start_listening: bool,
    },
    BarcodeScanner {
        title: String,
        description: String,
        alternative_option_label: Option<String>,
    },
    ThreadImport,
    ThreadKeychain {
        mac_extended_address: String,
    },
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Overlay::Settings => f.write_str("settings"),
            Overlay::Assist {
                pipeline_id,
                start_listening,
            } => write!(
                f,
                "assist (pipeline {}, listening {start_listening})",
                pipeline_id.as_deref().unwrap_or("default")
            ),
            Overlay::BarcodeScanner {
                title,
                description,
                alternative_option_label,
            } => {
                write!(f, "barcode scanner \"{title}\": {description}")?;
                if let Some(label) = alternative_option_label {
                    write!(f, " [{label}]")?;
                }
                Ok(())
            }
            Overlay::ThreadImport => f.write_str("thread credential import"),
            Overlay::ThreadKeychain {
                mac_extended_address,
            } => write!(f, "thread keychain transfer for {mac_extended_address}"),
        }
    }
}

/// What the native chrome currently shows.
#[derive(Debug, Default)]
pub struct ShellState {
    pub connection: Option<ConnectionEvent>,
    pub theme: ThemeUpdatePayload,
    pub toast: Option<ShowToastPayload>,
    pub overlay: Option<Overlay>,
    pub notices: Vec<String>,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any overlay that is already shown.
    pub fn present(&mut self, overlay: Overlay) {
        if let Some(previous) = self.overlay.replace(overlay) {
            debug!(?previous, "replacing overlay");
        }
    }

    pub fn dismiss_overlay(&mut self) -> Option<Overlay> {
        self.overlay.take()
    }

    pub fn scanner_open(&self) -> bool {
        matches!(self.overlay, Some(Overlay::BarcodeScanner { .. }))
    }

    pub fn show_toast(&mut self, toast: ShowToastPayload) {
        self.toast = Some(toast);
    }

    /// Hides the toast only when `id` matches the one shown.
    pub fn hide_toast(&mut self, id: &str) -> bool {
        if self.toast.as_ref().is_some_and(|toast| toast.id == id) {
            self.toast = None;
            true
        } else {
            false
        }
    }

    /// Returns true when the theme changed.
    pub fn set_theme(&mut self, theme: &ThemeUpdatePayload) -> bool {
        if self.theme == *theme {
            return false;
        }
        self.theme = theme.clone();
        true
    }
}

/// Shared handle through which the bus drives the shell state.
#[derive(Clone)]
pub struct ShellHandle {
    state: Rc<RefCell<ShellState>>,
    pending_scan: Rc<RefCell<Option<Responder>>>,
    emitter: Emitter,
}

impl ShellHandle {
    pub fn new(emitter: Emitter) -> Self {
        Self {
            state: Rc::new(RefCell::new(ShellState::new())),
            pending_scan: Rc::new(RefCell::new(None)),
            emitter,
        }
    }

    pub fn state(&self) -> std::cell::Ref<'_, ShellState> {
        self.state.borrow()
    }

    /// Pushes a natively-originated theme change to the dashboard.
    pub fn push_theme(&self, theme: ThemeUpdatePayload) {
        if !self.state.borrow_mut().set_theme(&theme) {
            return;
        }
        if let Err(err) = self.emitter.emit(&OutboundEvent::ThemeUpdate(theme)) {
            warn!("failed to push theme update: {err}");
        }
    }

    /// Reports the native view of connectivity to the dashboard.
    pub fn report_connection(&self, event: ConnectionEvent) {
        self.state.borrow_mut().connection = Some(event);
        let payload = ConnectionStatusPayload { event };
        if let Err(err) = self.emitter.emit(&OutboundEvent::ConnectionStatus(payload)) {
            warn!("failed to report connection status: {err}");
        }
    }

    pub fn navigate(&self, path: &str) {
        let event = OutboundEvent::Navigate {
            path: path.to_string(),
        };
        if let Err(err) = self.emitter.emit(&event) {
            warn!(path, "failed to request navigation: {err}");
        }
    }

    /// Finishes the open scan with a decoded code.
    pub fn complete_scan(&self, format: &str, value: &str) -> bool {
        let Some(responder) = self.pending_scan.borrow_mut().take() else {
            return false;
        };
        self.state.borrow_mut().dismiss_overlay();
        responder.succeed(json!({ "rawValue": value, "format": format }));
        true
    }

    fn cancel_scan(&self) {
        if let Some(responder) = self.pending_scan.borrow_mut().take() {
            responder.fail(json!({ "action": "canceled" }));
        }
    }
}

impl ShellUi for ShellHandle {
    fn show_settings(&self) {
        info!("presenting settings");
        self.state.borrow_mut().present(Overlay::Settings);
    }

    fn update_connection_status(&self, event: ConnectionEvent) {
        debug!(event = event.as_wire(), "dashboard connection status");
        self.state.borrow_mut().connection = Some(event);
    }

    fn show_assist(&self, request: &AssistShowPayload) {
        self.state.borrow_mut().present(Overlay::Assist {
            pipeline_id: request.pipeline_id.clone(),
            start_listening: request.start_listening,
        });
    }
}

impl ThemeSync for ShellHandle {
    fn apply(&self, theme: &ThemeUpdatePayload) {
        if self.state.borrow_mut().set_theme(theme) {
            info!(dark_mode = theme.dark_mode, theme = ?theme.theme, "theme updated");
        }
    }
}

impl ToastPresenter for ShellHandle {
    fn show(&self, toast: &ShowToastPayload) {
        self.state.borrow_mut().show_toast(toast.clone());
    }

    fn hide(&self, id: &str) {
        if !self.state.borrow_mut().hide_toast(id) {
            debug!(id, "toast already gone");
        }
    }
}

impl BarcodeScanner for ShellHandle {
    fn scan(&self, request: &BarcodeScanPayload, responder: Responder) {
        // A new scan supersedes one that never finished.
        self.cancel_scan();
        self.state.borrow_mut().present(Overlay::BarcodeScanner {
            title: request.title.clone(),
            description: request.description.clone(),
            alternative_option_label: request.alternative_option_label.clone(),
        });
        *self.pending_scan.borrow_mut() = Some(responder);
    }

    fn close(&self) {
        let mut state = self.state.borrow_mut();
        if state.scanner_open() {
            state.dismiss_overlay();
            drop(state);
            self.cancel_scan();
        }
    }

    fn notify(&self, message: &str) {
        let mut state = self.state.borrow_mut();
        if state.scanner_open() {
            state.notices.push(message.to_string());
        } else {
            debug!(message, "scanner notice without open scanner");
        }
    }
}

impl ThreadCredentials for ShellHandle {
    fn import_to_server(&self) {
        self.state.borrow_mut().present(Overlay::ThreadImport);
    }

    fn store_in_keychain(&self, credentials: &ThreadKeychainPayload) {
        self.state.borrow_mut().present(Overlay::ThreadKeychain {
            mac_extended_address: credentials.mac_extended_address.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::WriterSink;
    use serde_json::Value;

    fn handle() -> (ShellHandle, Rc<WriterSink<Vec<u8>>>) {
        let sink = Rc::new(WriterSink::new(Vec::new()));
        let emitter = Emitter::new(Rc::clone(&sink));
        (ShellHandle::new(emitter), sink)
    }

    fn sent(sink: &WriterSink<Vec<u8>>) -> Vec<Value> {
        sink.lines()
            .iter()
            .map(|line| {
                let json = line
                    .strip_prefix("window.externalBus(")
                    .and_then(|rest| rest.strip_suffix(");"))
                    .unwrap();
                serde_json::from_str(json).unwrap()
            })
            .collect()
    }

    fn toast(id: &str) -> ShowToastPayload {
        ShowToastPayload {
            id: id.into(),
            message: "hi".into(),
            dismissable: false,
            duration: None,
        }
    }

    #[test]
    fn overlays_describe_themselves() {
        let scanner = Overlay::BarcodeScanner {
            title: "Scan".into(),
            description: "Point at a QR code".into(),
            alternative_option_label: Some("Enter manually".into()),
        };
        assert_eq!(
            scanner.to_string(),
            r#"barcode scanner "Scan": Point at a QR code [Enter manually]"#
        );
        let assist = Overlay::Assist {
            pipeline_id: None,
            start_listening: true,
        };
        assert_eq!(assist.to_string(), "assist (pipeline default, listening true)");
    }

    #[test]
    fn hide_only_targets_visible_toast() {
        let (shell, _) = handle();

        shell.show(&toast("a"));
        shell.hide("b");
        assert_eq!(shell.state().toast.as_ref().map(|t| t.id.as_str()), Some("a"));

        shell.hide("a");
        assert!(shell.state().toast.is_none());
    }

    #[test]
    fn scan_completes_with_request_id() {
        let (shell, sink) = handle();
        let emitter = Emitter::new(Rc::clone(&sink));
        let request = BarcodeScanPayload {
            title: "Scan".into(),
            description: "QR".into(),
            alternative_option_label: None,
        };

        shell.scan(&request, emitter.responder(21));
        assert!(shell.state().scanner_open());
        shell.notify("Try again");
        assert_eq!(shell.state().notices, vec!["Try again".to_string()]);

        assert!(shell.complete_scan("qr_code", "WIFI:S:home;;"));
        assert!(!shell.state().scanner_open());
        assert!(!shell.complete_scan("qr_code", "again"));

        let messages = sent(&sink);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["id"], 21);
        assert_eq!(messages[0]["success"], true);
        assert_eq!(messages[0]["result"]["rawValue"], "WIFI:S:home;;");
    }

    #[test]
    fn closing_scanner_cancels_pending_scan() {
        let (shell, sink) = handle();
        let emitter = Emitter::new(Rc::clone(&sink));
        let request = BarcodeScanPayload {
            title: "Scan".into(),
            description: "QR".into(),
            alternative_option_label: None,
        };

        shell.scan(&request, emitter.responder(4));
        shell.close();

        assert!(shell.state().overlay.is_none());
        let messages = sent(&sink);
        assert_eq!(messages[0]["id"], 4);
        assert_eq!(messages[0]["success"], false);
    }

    #[test]
    fn close_leaves_other_overlays_alone() {
        let (shell, sink) = handle();

        shell.show_settings();
        shell.close();

        assert_eq!(shell.state().overlay, Some(Overlay::Settings));
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn pushes_theme_only_when_changed() {
        let (shell, sink) = handle();
        let theme = ThemeUpdatePayload {
            dark_mode: true,
            ..ThemeUpdatePayload::default()
        };

        shell.push_theme(theme.clone());
        shell.push_theme(theme);

        let messages = sent(&sink);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["type"], "theme-update");
        assert_eq!(messages[0]["payload"]["dark_mode"], true);
    }

    #[test]
    fn reports_connection_and_navigation() {
        let (shell, sink) = handle();

        shell.report_connection(ConnectionEvent::Disconnected);
        shell.navigate("/config/devices");

        assert_eq!(shell.state().connection, Some(ConnectionEvent::Disconnected));
        let messages = sent(&sink);
        assert_eq!(messages[0]["type"], "connection-status");
        assert_eq!(messages[0]["payload"]["event"], "disconnected");
        assert_eq!(messages[1]["command"], "navigate");
        assert_eq!(messages[1]["payload"]["path"], "/config/devices");
    }
}
