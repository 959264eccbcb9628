//! External Bus bridge between the hosted dashboard and the native shell.
//!
//! The dashboard posts `{ "id", "type", "payload" }` dictionaries to the
//! `externalBus` script message handler. A [`Dispatcher`] resolves the type
//! against the catalogs, decodes the payload into a typed value, and hands
//! it to the matching native [`capability`]. Native-origin events and
//! request replies go back through the [`Emitter`] as
//! `window.externalBus(<json>);` scripts.

pub mod app_config;
pub mod capability;
pub mod catalog;
pub mod dispatch;
pub mod emit;
pub mod error;
pub mod payload;
pub mod value;
pub mod wire;

pub use app_config::AppConfiguration;
pub use capability::Capabilities;
pub use catalog::{CommandType, ExtendedMessageType, MessageKind, MessageType};
pub use dispatch::{Dispatcher, Outcome};
pub use emit::{Emitter, OutboundEvent, Responder, ScriptSink};
pub use error::BusError;
pub use value::{PayloadMap, WireValue};
pub use wire::WireMessage;
