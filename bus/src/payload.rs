//! Typed payloads for the messages that carry data.
//!
//! Decoding is all-or-nothing: a missing or mistyped required field yields
//! `None`, while optional fields fall back to their defaults instead of
//! failing the decode.

use std::time::Duration;

use tracing::warn;

use crate::catalog::{ExtendedMessageType, MessageKind, MessageType};
use crate::value::{Fields, FieldsBuilder, PayloadMap};

/// Builds a typed value from an untyped payload.
pub trait Decode: Sized {
    fn decode(fields: Fields<'_>) -> Option<Self>;

    fn from_payload(payload: Option<&PayloadMap>) -> Option<Self> {
        Self::decode(Fields::new(payload))
    }
}

/// Produces the wire payload for a typed value.
pub trait Encode {
    fn encode(&self) -> PayloadMap;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HapticKind {
    Success,
    Error,
    Warning,
    Light,
    Medium,
    Heavy,
    Selection,
}

impl HapticKind {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "success" => Some(HapticKind::Success),
            "error" | "failure" => Some(HapticKind::Error),
            "warning" => Some(HapticKind::Warning),
            "light" => Some(HapticKind::Light),
            "medium" => Some(HapticKind::Medium),
            "heavy" => Some(HapticKind::Heavy),
            "selection" => Some(HapticKind::Selection),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            HapticKind::Success => "success",
            HapticKind::Error => "error",
            HapticKind::Warning => "warning",
            HapticKind::Light => "light",
            HapticKind::Medium => "medium",
            HapticKind::Heavy => "heavy",
            HapticKind::Selection => "selection",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HapticPayload {
    pub kind: HapticKind,
}

impl Decode for HapticPayload {
    fn decode(fields: Fields<'_>) -> Option<Self> {
        let kind = HapticKind::from_wire(fields.str("hapticType")?)?;
        Some(Self { kind })
    }
}

impl Encode for HapticPayload {
    fn encode(&self) -> PayloadMap {
        FieldsBuilder::new()
            .set("hapticType", self.kind.as_wire())
            .build()
    }
}

/// Connection state of the dashboard's websocket.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ConnectionEvent {
    Connected,
    Disconnected,
    AuthInvalid,
}

impl ConnectionEvent {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "connected" => Some(ConnectionEvent::Connected),
            "disconnected" => Some(ConnectionEvent::Disconnected),
            "auth-invalid" => Some(ConnectionEvent::AuthInvalid),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            ConnectionEvent::Connected => "connected",
            ConnectionEvent::Disconnected => "disconnected",
            ConnectionEvent::AuthInvalid => "auth-invalid",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ConnectionStatusPayload {
    pub event: ConnectionEvent,
}

impl Decode for ConnectionStatusPayload {
    fn decode(fields: Fields<'_>) -> Option<Self> {
        let event = ConnectionEvent::from_wire(fields.str("event")?)?;
        Some(Self { event })
    }
}

impl Encode for ConnectionStatusPayload {
    fn encode(&self) -> PayloadMap {
        FieldsBuilder::new().set("event", self.event.as_wire()).build()
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TagWritePayload {
    pub tag: String,
    pub name: Option<String>,
}

impl Decode for TagWritePayload {
    fn decode(fields: Fields<'_>) -> Option<Self> {
        Some(Self {
            tag: fields.non_empty_str("tag")?.to_string(),
            name: fields.string("name"),
        })
    }
}

impl Encode for TagWritePayload {
    fn encode(&self) -> PayloadMap {
        FieldsBuilder::new()
            .set("tag", self.tag.as_str())
            .set_opt("name", self.name.as_deref())
            .build()
    }
}

/// Theme colors shared between the dashboard and the native chrome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeUpdatePayload {
    pub theme: Option<String>,
    pub dark_mode: bool,
    pub primary_color: Option<String>,
    pub accent_color: Option<String>,
}

impl Decode for ThemeUpdatePayload {
    fn decode(fields: Fields<'_>) -> Option<Self> {
        Some(Self {
            theme: fields.string("theme"),
            dark_mode: fields.bool("dark_mode").unwrap_or(false),
            primary_color: fields.string("primary_color"),
            accent_color: fields.string("accent_color"),
        })
    }
}

impl Encode for ThemeUpdatePayload {
    fn encode(&self) -> PayloadMap {
        FieldsBuilder::new()
            .set_opt("theme", self.theme.as_deref())
            .set("dark_mode", self.dark_mode)
            .set_opt("primary_color", self.primary_color.as_deref())
            .set_opt("accent_color", self.accent_color.as_deref())
            .build()
    }
}

/// Thread network the frontend prefers for a Matter commission.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ThreadNetwork {
    pub mac_extended_address: String,
    pub active_operational_dataset: String,
    pub extended_pan_id: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct MatterCommissionPayload {
    pub preferred_network: Option<ThreadNetwork>,
}

// All three values must be present for the network to be usable.
impl Decode for ThreadNetwork {
    fn decode(fields: Fields<'_>) -> Option<Self> {
        Some(Self {
            mac_extended_address: fields.non_empty_str("mac_extended_address")?.to_string(),
            active_operational_dataset: fields
                .non_empty_str("active_operational_dataset")?
                .to_string(),
            extended_pan_id: fields.non_empty_str("extended_pan_id")?.to_string(),
        })
    }
}

impl Decode for MatterCommissionPayload {
    fn decode(fields: Fields<'_>) -> Option<Self> {
        Some(Self {
            preferred_network: ThreadNetwork::decode(fields),
        })
    }
}

impl Encode for MatterCommissionPayload {
    fn encode(&self) -> PayloadMap {
        match &self.preferred_network {
            Some(network) => FieldsBuilder::new()
                .set("mac_extended_address", network.mac_extended_address.as_str())
                .set(
                    "active_operational_dataset",
                    network.active_operational_dataset.as_str(),
                )
                .set("extended_pan_id", network.extended_pan_id.as_str())
                .build(),
            None => PayloadMap::new(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BarcodeScanPayload {
    pub title: String,
    pub description: String,
    pub alternative_option_label: Option<String>,
}

impl Decode for BarcodeScanPayload {
    fn decode(fields: Fields<'_>) -> Option<Self> {
        Some(Self {
            title: fields.string("title")?,
            description: fields.string("description")?,
            alternative_option_label: fields.string("alternative_option_label"),
        })
    }
}

impl Encode for BarcodeScanPayload {
    fn encode(&self) -> PayloadMap {
        FieldsBuilder::new()
            .set("title", self.title.as_str())
            .set("description", self.description.as_str())
            .set_opt(
                "alternative_option_label",
                self.alternative_option_label.as_deref(),
            )
            .build()
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BarcodeNotifyPayload {
    pub message: String,
}

impl Decode for BarcodeNotifyPayload {
    fn decode(fields: Fields<'_>) -> Option<Self> {
        Some(Self {
            message: fields.string("message")?,
        })
    }
}

impl Encode for BarcodeNotifyPayload {
    fn encode(&self) -> PayloadMap {
        FieldsBuilder::new()
            .set("message", self.message.as_str())
            .build()
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ThreadKeychainPayload {
    pub mac_extended_address: String,
    pub active_operational_dataset: String,
}

impl Decode for ThreadKeychainPayload {
    fn decode(fields: Fields<'_>) -> Option<Self> {
        Some(Self {
            mac_extended_address: fields.string("mac_extended_address")?,
            active_operational_dataset: fields.string("active_operational_dataset")?,
        })
    }
}

impl Encode for ThreadKeychainPayload {
    fn encode(&self) -> PayloadMap {
        FieldsBuilder::new()
            .set("mac_extended_address", self.mac_extended_address.as_str())
            .set(
                "active_operational_dataset",
                self.active_operational_dataset.as_str(),
            )
            .build()
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct AssistShowPayload {
    pub pipeline_id: Option<String>,
    pub start_listening: bool,
}

impl Decode for AssistShowPayload {
    fn decode(fields: Fields<'_>) -> Option<Self> {
        Some(Self {
            pipeline_id: fields.string("pipeline_id"),
            start_listening: fields.bool("start_listening").unwrap_or(false),
        })
    }
}

impl Encode for AssistShowPayload {
    fn encode(&self) -> PayloadMap {
        FieldsBuilder::new()
            .set_opt("pipeline_id", self.pipeline_id.as_deref())
            .set("start_listening", self.start_listening)
            .build()
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ImprovConfigurePayload {
    pub name: Option<String>,
}

impl Decode for ImprovConfigurePayload {
    fn decode(fields: Fields<'_>) -> Option<Self> {
        Some(Self {
            name: fields.string("name"),
        })
    }
}

impl Encode for ImprovConfigurePayload {
    fn encode(&self) -> PayloadMap {
        FieldsBuilder::new()
            .set_opt("name", self.name.as_deref())
            .build()
    }
}

/// Request to show a toast. `id` is an opaque token used by a later hide.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowToastPayload {
    pub id: String,
    pub message: String,
    pub dismissable: bool,
    /// Auto-dismiss delay in seconds. `None` keeps the toast until hidden.
    pub duration: Option<f64>,
}

impl ShowToastPayload {
    pub fn auto_dismiss(&self) -> Option<Duration> {
        self.duration
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

impl Decode for ShowToastPayload {
    fn decode(fields: Fields<'_>) -> Option<Self> {
        Some(Self {
            id: fields.string("id")?,
            message: fields.string("message")?,
            dismissable: fields.bool("dismissable").unwrap_or(false),
            duration: fields.number("duration").filter(|secs| usable_duration(*secs)),
        })
    }
}

impl Encode for ShowToastPayload {
    fn encode(&self) -> PayloadMap {
        FieldsBuilder::new()
            .set("id", self.id.as_str())
            .set("message", self.message.as_str())
            .set("dismissable", self.dismissable)
            .set_opt("duration", self.duration.filter(|secs| {
                let usable = usable_duration(*secs);
                if !usable {
                    warn!(id = %self.id, duration = secs, "dropping unusable toast duration");
                }
                usable
            }))
            .build()
    }
}

fn usable_duration(secs: f64) -> bool {
    secs.is_finite() && secs >= 0.0
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HideToastPayload {
    pub id: String,
}

impl Decode for HideToastPayload {
    fn decode(fields: Fields<'_>) -> Option<Self> {
        Some(Self {
            id: fields.string("id")?,
        })
    }
}

impl Encode for HideToastPayload {
    fn encode(&self) -> PayloadMap {
        FieldsBuilder::new().set("id", self.id.as_str()).build()
    }
}

/// A decoded inbound message, one variant per inbound catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    ConfigGet,
    ConfigScreenShow,
    Haptic(HapticPayload),
    ConnectionStatus(ConnectionStatusPayload),
    TagRead,
    TagWrite(TagWritePayload),
    ThemeUpdate(ThemeUpdatePayload),
    MatterCommission(MatterCommissionPayload),
    ThreadImportCredentials,
    BarcodeScan(BarcodeScanPayload),
    BarcodeClose,
    BarcodeNotify(BarcodeNotifyPayload),
    ThreadStoreInKeychain(ThreadKeychainPayload),
    AssistShow(AssistShowPayload),
    ImprovScan,
    ImprovConfigureDevice(ImprovConfigurePayload),
    ToastShow(ShowToastPayload),
    ToastHide(HideToastPayload),
}

impl Decoded {
    /// Decodes the payload for `kind`. Command kinds never decode.
    pub fn decode(kind: MessageKind, payload: Option<&PayloadMap>) -> Option<Self> {
        let decoded = match kind {
            MessageKind::Core(kind) => match kind {
                MessageType::ConfigGet => Decoded::ConfigGet,
                MessageType::ConfigScreenShow => Decoded::ConfigScreenShow,
                MessageType::Haptic => Decoded::Haptic(HapticPayload::from_payload(payload)?),
                MessageType::ConnectionStatus => {
                    Decoded::ConnectionStatus(ConnectionStatusPayload::from_payload(payload)?)
                }
                MessageType::TagRead => Decoded::TagRead,
                MessageType::TagWrite => Decoded::TagWrite(TagWritePayload::from_payload(payload)?),
                MessageType::ThemeUpdate => {
                    Decoded::ThemeUpdate(ThemeUpdatePayload::from_payload(payload)?)
                }
                MessageType::MatterCommission => {
                    Decoded::MatterCommission(MatterCommissionPayload::from_payload(payload)?)
                }
                MessageType::ThreadImportCredentials => Decoded::ThreadImportCredentials,
                MessageType::BarcodeScan => {
                    Decoded::BarcodeScan(BarcodeScanPayload::from_payload(payload)?)
                }
            },
            MessageKind::Extended(kind) => match kind {
                ExtendedMessageType::BarcodeClose => Decoded::BarcodeClose,
                ExtendedMessageType::BarcodeNotify => {
                    Decoded::BarcodeNotify(BarcodeNotifyPayload::from_payload(payload)?)
                }
                ExtendedMessageType::ThreadStoreInKeychain => {
                    Decoded::ThreadStoreInKeychain(ThreadKeychainPayload::from_payload(payload)?)
                }
                ExtendedMessageType::AssistShow => {
                    Decoded::AssistShow(AssistShowPayload::from_payload(payload)?)
                }
                ExtendedMessageType::ImprovScan => Decoded::ImprovScan,
                ExtendedMessageType::ImprovConfigureDevice => {
                    Decoded::ImprovConfigureDevice(ImprovConfigurePayload::from_payload(payload)?)
                }
                ExtendedMessageType::ToastShow => {
                    Decoded::ToastShow(ShowToastPayload::from_payload(payload)?)
                }
                ExtendedMessageType::ToastHide => {
                    Decoded::ToastHide(HideToastPayload::from_payload(payload)?)
                }
            },
            MessageKind::Command(_) => return None,
        };
        Some(decoded)
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Decoded::ConfigGet => MessageType::ConfigGet.into(),
            Decoded::ConfigScreenShow => MessageType::ConfigScreenShow.into(),
            Decoded::Haptic(_) => MessageType::Haptic.into(),
            Decoded::ConnectionStatus(_) => MessageType::ConnectionStatus.into(),
            Decoded::TagRead => MessageType::TagRead.into(),
            Decoded::TagWrite(_) => MessageType::TagWrite.into(),
            Decoded::ThemeUpdate(_) => MessageType::ThemeUpdate.into(),
            Decoded::MatterCommission(_) => MessageType::MatterCommission.into(),
            Decoded::ThreadImportCredentials => MessageType::ThreadImportCredentials.into(),
            Decoded::BarcodeScan(_) => MessageType::BarcodeScan.into(),
            Decoded::BarcodeClose => ExtendedMessageType::BarcodeClose.into(),
            Decoded::BarcodeNotify(_) => ExtendedMessageType::BarcodeNotify.into(),
            Decoded::ThreadStoreInKeychain(_) => ExtendedMessageType::ThreadStoreInKeychain.into(),
            Decoded::AssistShow(_) => ExtendedMessageType::AssistShow.into(),
            Decoded::ImprovScan => ExtendedMessageType::ImprovScan.into(),
            Decoded::ImprovConfigureDevice(_) => ExtendedMessageType::ImprovConfigureDevice.into(),
            Decoded::ToastShow(_) => ExtendedMessageType::ToastShow.into(),
            Decoded::ToastHide(_) => ExtendedMessageType::ToastHide.into(),
        }
    }
}
