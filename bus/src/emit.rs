use std::cell::Cell;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::catalog::{CommandType, ExtendedMessageType, MessageKind, MessageType};
use crate::error::BusError;
use crate::payload::{
    ConnectionStatusPayload, Encode, HideToastPayload, ShowToastPayload, ThemeUpdatePayload,
};
use crate::value::FieldsBuilder;
use crate::wire::{OutgoingMessage, ResultMessage};

/// Default JavaScript entry point the dashboard exposes for native messages.
pub const DEFAULT_SCRIPT_RECEIVER: &str = "window.externalBus";

/// Injects scripts into the hosted web view.
pub trait ScriptSink {
    fn evaluate(&self, script: &str);
}

/// Native-origin event pushed to the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    ThemeUpdate(ThemeUpdatePayload),
    ConnectionStatus(ConnectionStatusPayload),
    ShowToast(ShowToastPayload),
    HideToast(HideToastPayload),
    Navigate { path: String },
    Restart,
    ShowAutomationEditor { config: Value },
    ImprovDiscoveredDevice { name: String },
}

impl OutboundEvent {
    pub fn kind(&self) -> MessageKind {
        match self {
            OutboundEvent::ThemeUpdate(_) => MessageType::ThemeUpdate.into(),
            OutboundEvent::ConnectionStatus(_) => MessageType::ConnectionStatus.into(),
            OutboundEvent::ShowToast(_) => ExtendedMessageType::ToastShow.into(),
            OutboundEvent::HideToast(_) => ExtendedMessageType::ToastHide.into(),
            OutboundEvent::Navigate { .. } => CommandType::Navigate.into(),
            OutboundEvent::Restart => CommandType::Restart.into(),
            OutboundEvent::ShowAutomationEditor { .. } => CommandType::ShowAutomationEditor.into(),
            OutboundEvent::ImprovDiscoveredDevice { .. } => CommandType::ImprovDiscoveredDevice.into(),
        }
    }

    fn payload(&self) -> Result<Value, BusError> {
        let map = match self {
            OutboundEvent::ThemeUpdate(payload) => payload.encode(),
            OutboundEvent::ConnectionStatus(payload) => payload.encode(),
            OutboundEvent::ShowToast(payload) => payload.encode(),
            OutboundEvent::HideToast(payload) => payload.encode(),
            OutboundEvent::Navigate { path } => {
                FieldsBuilder::new().set("path", path.as_str()).build()
            }
            OutboundEvent::Restart => FieldsBuilder::new().build(),
            OutboundEvent::ShowAutomationEditor { config } => {
                return Ok(serde_json::json!({ "config": config }));
            }
            OutboundEvent::ImprovDiscoveredDevice { name } => {
                FieldsBuilder::new().set("name", name.as_str()).build()
            }
        };
        serde_json::to_value(map).map_err(BusError::Serialize)
    }
}

/// Serializes outbound traffic and hands it to the web view.
///
/// Cloning is cheap; clones share the sink and the outbound id sequence.
#[derive(Clone)]
pub struct Emitter {
    sink: Rc<dyn ScriptSink>,
    receiver: Rc<str>,
    next_id: Rc<Cell<u64>>,
}

impl Emitter {
    pub fn new<S: ScriptSink + 'static>(sink: Rc<S>) -> Self {
        Self::with_receiver(sink, DEFAULT_SCRIPT_RECEIVER)
    }

    pub fn with_receiver<S: ScriptSink + 'static>(sink: Rc<S>, receiver: &str) -> Self {
        let sink: Rc<dyn ScriptSink> = sink;
        Self {
            sink,
            receiver: Rc::from(receiver),
            next_id: Rc::new(Cell::new(1)),
        }
    }

    /// Sends an event or command and returns the id it was sent with.
    pub fn emit(&self, event: &OutboundEvent) -> Result<u64, BusError> {
        let payload = event.payload()?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let message = match event.kind() {
            MessageKind::Command(command) => OutgoingMessage {
                id,
                r#type: "command",
                command: Some(command.as_wire()),
                payload,
            },
            kind => OutgoingMessage {
                id,
                r#type: kind.as_wire(),
                command: None,
                payload,
            },
        };
        self.send(&message)?;
        Ok(id)
    }

    /// Answers the inbound request identified by `id`.
    pub fn reply(&self, id: u64, success: bool, result: &Value) -> Result<(), BusError> {
        self.send(&ResultMessage::new(id, success, result))
    }

    /// Creates a one-shot reply handle for the inbound request `id`.
    pub fn responder(&self, id: u64) -> Responder {
        Responder {
            id,
            emitter: self.clone(),
        }
    }

    fn send<T: Serialize>(&self, message: &T) -> Result<(), BusError> {
        let json = serde_json::to_string(message).map_err(BusError::Serialize)?;
        debug!(%json, "sending external bus message");
        let script = format!("{}({json});", self.receiver);
        self.sink.evaluate(&script);
        Ok(())
    }
}

/// Reply handle handed to capabilities that answer asynchronously.
pub struct Responder {
    id: u64,
    emitter: Emitter,
}

impl Responder {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn succeed(self, result: Value) {
        self.respond(true, result);
    }

    pub fn fail(self, result: Value) {
        self.respond(false, result);
    }

    fn respond(self, success: bool, result: Value) {
        if let Err(err) = self.emitter.reply(self.id, success, &result) {
            error!(id = self.id, "failed to reply over external bus: {err}");
        }
    }
}
