//! Native capability handles the dispatcher routes to.
//!
//! Every capability is a trait object injected at construction time. Work
//! that completes later reports back through a [`Responder`] or the
//! [`Emitter`](crate::Emitter), never through the dispatcher.

use std::rc::Rc;

use serde_json::json;
use tracing::debug;

use crate::emit::Responder;
use crate::payload::{
    AssistShowPayload, BarcodeScanPayload, ConnectionEvent, HapticKind, MatterCommissionPayload,
    ShowToastPayload, TagWritePayload, ThemeUpdatePayload, ThreadKeychainPayload,
};

/// Screens and chrome owned by the native shell.
pub trait ShellUi {
    /// Presents the native settings screen.
    fn show_settings(&self);

    /// Reflects the dashboard's connection state in native chrome.
    fn update_connection_status(&self, event: ConnectionEvent);

    /// Presents the voice assistant.
    fn show_assist(&self, request: &AssistShowPayload);
}

pub trait HapticEngine {
    fn perform(&self, kind: HapticKind);
}

/// NFC tag access.
pub trait TagReader {
    fn read(&self, responder: Responder);

    fn write(&self, request: &TagWritePayload, responder: Responder);
}

pub trait ThemeSync {
    fn apply(&self, theme: &ThemeUpdatePayload);
}

pub trait MatterClient {
    /// Starts commissioning, optionally preferring the given Thread network.
    fn commission(&self, request: &MatterCommissionPayload);
}

pub trait ThreadCredentials {
    /// Starts the flow that shares platform Thread credentials with the server.
    fn import_to_server(&self);

    /// Stores server-provided credentials in the platform keychain.
    fn store_in_keychain(&self, credentials: &ThreadKeychainPayload);
}

pub trait BarcodeScanner {
    fn scan(&self, request: &BarcodeScanPayload, responder: Responder);

    fn close(&self);

    /// Shows a message over the open scanner.
    fn notify(&self, message: &str);
}

/// Improv Wi-Fi provisioning over Bluetooth.
pub trait Improv {
    fn scan(&self);

    fn configure(&self, device_name: Option<&str>);
}

pub trait ToastPresenter {
    fn show(&self, toast: &ShowToastPayload);

    /// Hides the toast only if `id` is the one currently shown.
    fn hide(&self, id: &str);
}

/// Capability that is not available in this build.
///
/// Requests that expect a reply are answered with a failure so the
/// dashboard does not wait forever.
#[derive(Debug, Default)]
pub struct Unavailable;

impl ShellUi for Unavailable {
    fn show_settings(&self) {
        debug!("settings screen unavailable");
    }

    fn update_connection_status(&self, _event: ConnectionEvent) {}

    fn show_assist(&self, _request: &AssistShowPayload) {
        debug!("assist unavailable");
    }
}

impl HapticEngine for Unavailable {
    fn perform(&self, _kind: HapticKind) {}
}

impl TagReader for Unavailable {
    fn read(&self, responder: Responder) {
        responder.fail(json!({ "success": false }));
    }

    fn write(&self, _request: &TagWritePayload, responder: Responder) {
        responder.fail(json!({ "success": false }));
    }
}

impl ThemeSync for Unavailable {
    fn apply(&self, _theme: &ThemeUpdatePayload) {}
}

impl MatterClient for Unavailable {
    fn commission(&self, _request: &MatterCommissionPayload) {
        debug!("matter commissioning unavailable");
    }
}

impl ThreadCredentials for Unavailable {
    fn import_to_server(&self) {}

    fn store_in_keychain(&self, _credentials: &ThreadKeychainPayload) {}
}

impl BarcodeScanner for Unavailable {
    fn scan(&self, _request: &BarcodeScanPayload, responder: Responder) {
        responder.fail(json!({ "action": "canceled" }));
    }

    fn close(&self) {}

    fn notify(&self, _message: &str) {}
}

impl Improv for Unavailable {
    fn scan(&self) {}

    fn configure(&self, _device_name: Option<&str>) {}
}

impl ToastPresenter for Unavailable {
    fn show(&self, _toast: &ShowToastPayload) {}

    fn hide(&self, _id: &str) {}
}

/// The full set of handles a [`Dispatcher`](crate::Dispatcher) routes to.
#[derive(Clone)]
pub struct Capabilities {
    pub ui: Rc<dyn ShellUi>,
    pub haptics: Rc<dyn HapticEngine>,
    pub tags: Rc<dyn TagReader>,
    pub theme: Rc<dyn ThemeSync>,
    pub matter: Rc<dyn MatterClient>,
    pub thread: Rc<dyn ThreadCredentials>,
    pub barcode: Rc<dyn BarcodeScanner>,
    pub improv: Rc<dyn Improv>,
    pub toasts: Rc<dyn ToastPresenter>,
}

impl Default for Capabilities {
    fn default() -> Self {
        let unavailable = Rc::new(Unavailable);
        Self {
            ui: unavailable.clone(),
            haptics: unavailable.clone(),
            tags: unavailable.clone(),
            theme: unavailable.clone(),
            matter: unavailable.clone(),
            thread: unavailable.clone(),
            barcode: unavailable.clone(),
            improv: unavailable.clone(),
            toasts: unavailable,
        }
    }
}
