use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::app_config::AppConfiguration;
use crate::capability::Capabilities;
use crate::catalog::{MessageKind, MessageType};
use crate::emit::Emitter;
use crate::payload::Decoded;
use crate::wire::WireMessage;

/// What happened to one inbound message. Diagnostic only.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Outcome {
    /// The message was routed to its capability.
    Handled(MessageKind),
    /// The type is not in any inbound catalog.
    Unknown,
    /// The type is known but the payload or request id was unusable.
    Rejected(MessageKind),
    /// The raw string was not a wire message.
    Malformed,
}

/// Routes inbound bus messages to native capabilities.
///
/// Dispatch is synchronous and keeps no per-message state: each call is
/// handled once, in arrival order, and nothing is retried or deduplicated.
pub struct Dispatcher {
    capabilities: Capabilities,
    emitter: Emitter,
    config: AppConfiguration,
}

impl Dispatcher {
    pub fn new(capabilities: Capabilities, emitter: Emitter, config: AppConfiguration) -> Self {
        Self {
            capabilities,
            emitter,
            config,
        }
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    /// Parses and dispatches the raw string posted by the web view.
    pub fn dispatch_raw(&self, raw: &str) -> Outcome {
        match WireMessage::from_json(raw) {
            Ok(message) => self.dispatch(&message),
            Err(err) => {
                error!("received invalid external message {raw}: {err}");
                Outcome::Malformed
            }
        }
    }

    pub fn dispatch(&self, message: &WireMessage) -> Outcome {
        let Some(kind) = MessageKind::resolve(&message.r#type) else {
            debug!(message_type = %message.r#type, "ignoring unknown external bus message");
            return Outcome::Unknown;
        };

        let Some(decoded) = Decoded::decode(kind, message.payload.as_ref()) else {
            warn!(%kind, payload = ?message.payload, "external bus payload failed to decode");
            self.fail_request(kind, message.id);
            return Outcome::Rejected(kind);
        };

        if self.route(decoded, message.id) {
            Outcome::Handled(kind)
        } else {
            Outcome::Rejected(kind)
        }
    }

    fn route(&self, decoded: Decoded, id: Option<u64>) -> bool {
        let caps = &self.capabilities;
        match decoded {
            Decoded::ConfigGet => {
                let Some(id) = self.request_id(MessageType::ConfigGet, id) else {
                    return false;
                };
                self.reply_config(id);
            }
            Decoded::ConfigScreenShow => caps.ui.show_settings(),
            Decoded::Haptic(payload) => {
                debug!(haptic = payload.kind.as_wire(), "handle haptic");
                caps.haptics.perform(payload.kind);
            }
            Decoded::ConnectionStatus(payload) => caps.ui.update_connection_status(payload.event),
            Decoded::TagRead => {
                let Some(id) = self.request_id(MessageType::TagRead, id) else {
                    return false;
                };
                caps.tags.read(self.emitter.responder(id));
            }
            Decoded::TagWrite(payload) => {
                let Some(id) = self.request_id(MessageType::TagWrite, id) else {
                    return false;
                };
                caps.tags.write(&payload, self.emitter.responder(id));
            }
            Decoded::ThemeUpdate(payload) => caps.theme.apply(&payload),
            Decoded::MatterCommission(payload) => {
                debug!(
                    preferred_network = payload.preferred_network.is_some(),
                    "matter commission requested"
                );
                caps.matter.commission(&payload);
            }
            Decoded::ThreadImportCredentials => caps.thread.import_to_server(),
            Decoded::BarcodeScan(payload) => {
                let Some(id) = self.request_id(MessageType::BarcodeScan, id) else {
                    return false;
                };
                caps.barcode.scan(&payload, self.emitter.responder(id));
            }
            Decoded::BarcodeClose => caps.barcode.close(),
            Decoded::BarcodeNotify(payload) => caps.barcode.notify(&payload.message),
            Decoded::ThreadStoreInKeychain(payload) => caps.thread.store_in_keychain(&payload),
            Decoded::AssistShow(payload) => caps.ui.show_assist(&payload),
            Decoded::ImprovScan => caps.improv.scan(),
            Decoded::ImprovConfigureDevice(payload) => {
                caps.improv.configure(payload.name.as_deref())
            }
            Decoded::ToastShow(payload) => caps.toasts.show(&payload),
            Decoded::ToastHide(payload) => caps.toasts.hide(&payload.id),
        }
        true
    }

    fn request_id(&self, kind: MessageType, id: Option<u64>) -> Option<u64> {
        if id.is_none() {
            warn!(kind = kind.as_wire(), "external bus request without id");
        }
        id
    }

    /// Answers a tag write the dashboard is awaiting even when its payload
    /// is unusable.
    fn fail_request(&self, kind: MessageKind, id: Option<u64>) {
        let (MessageKind::Core(MessageType::TagWrite), Some(id)) = (kind, id) else {
            return;
        };
        if let Err(err) = self.emitter.reply(id, false, &json!({"success": false})) {
            error!(id, "failed to answer tag/write: {err}");
        }
    }

    fn reply_config(&self, id: u64) {
        let result = match serde_json::to_value(&self.config) {
            Ok(result) => result,
            Err(err) => {
                error!("failed to encode app configuration: {err}");
                return;
            }
        };
        match self.emitter.reply(id, true, &result) {
            Ok(()) => info!(id, "answered config/get"),
            Err(err) => error!(id, "failed to answer config/get: {err}"),
        }
    }
}
