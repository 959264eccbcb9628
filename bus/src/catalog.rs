use std::fmt;

/// Core message types exchanged with the dashboard.
///
/// Wire keys are part of the contract with deployed frontends. New entries
/// may be added; existing keys are never renamed or reused.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MessageType {
    ConfigGet,
    ConfigScreenShow,
    Haptic,
    ConnectionStatus,
    TagRead,
    TagWrite,
    ThemeUpdate,
    MatterCommission,
    ThreadImportCredentials,
    BarcodeScan,
}

impl MessageType {
    /// Every core message type, in declaration order.
    pub const ALL: [MessageType; 10] = [
        MessageType::ConfigGet,
        MessageType::ConfigScreenShow,
        MessageType::Haptic,
        MessageType::ConnectionStatus,
        MessageType::TagRead,
        MessageType::TagWrite,
        MessageType::ThemeUpdate,
        MessageType::MatterCommission,
        MessageType::ThreadImportCredentials,
        MessageType::BarcodeScan,
    ];

    /// Returns the key used on the wire.
    pub fn as_wire(self) -> &'static str {
        match self {
            MessageType::ConfigGet => "config/get",
            MessageType::ConfigScreenShow => "config_screen/show",
            MessageType::Haptic => "haptic",
            MessageType::ConnectionStatus => "connection-status",
            MessageType::TagRead => "tag/read",
            MessageType::TagWrite => "tag/write",
            MessageType::ThemeUpdate => "theme-update",
            MessageType::MatterCommission => "matter/commission",
            MessageType::ThreadImportCredentials => "thread/import_credentials",
            MessageType::BarcodeScan => "barcode/scan",
        }
    }

    /// Exact, case-sensitive lookup of a wire key.
    pub fn from_wire(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_wire() == key)
    }
}

/// Inbound commands beyond the core set.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ExtendedMessageType {
    BarcodeClose,
    BarcodeNotify,
    ThreadStoreInKeychain,
    AssistShow,
    ImprovScan,
    ImprovConfigureDevice,
    ToastShow,
    ToastHide,
}

impl ExtendedMessageType {
    pub const ALL: [ExtendedMessageType; 8] = [
        ExtendedMessageType::BarcodeClose,
        ExtendedMessageType::BarcodeNotify,
        ExtendedMessageType::ThreadStoreInKeychain,
        ExtendedMessageType::AssistShow,
        ExtendedMessageType::ImprovScan,
        ExtendedMessageType::ImprovConfigureDevice,
        ExtendedMessageType::ToastShow,
        ExtendedMessageType::ToastHide,
    ];

    pub fn as_wire(self) -> &'static str {
        match self {
            ExtendedMessageType::BarcodeClose => "barcode/close",
            ExtendedMessageType::BarcodeNotify => "barcode/notify",
            ExtendedMessageType::ThreadStoreInKeychain => "thread/store_in_platform_keychain",
            ExtendedMessageType::AssistShow => "assist/show",
            ExtendedMessageType::ImprovScan => "improv/scan",
            ExtendedMessageType::ImprovConfigureDevice => "improv/configure_device",
            ExtendedMessageType::ToastShow => "toast/show",
            ExtendedMessageType::ToastHide => "toast/hide",
        }
    }

    pub fn from_wire(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_wire() == key)
    }
}

/// Commands the shell sends to the dashboard. Never accepted inbound.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CommandType {
    Navigate,
    Restart,
    ShowAutomationEditor,
    ImprovDiscoveredDevice,
}

impl CommandType {
    pub const ALL: [CommandType; 4] = [
        CommandType::Navigate,
        CommandType::Restart,
        CommandType::ShowAutomationEditor,
        CommandType::ImprovDiscoveredDevice,
    ];

    pub fn as_wire(self) -> &'static str {
        match self {
            CommandType::Navigate => "navigate",
            CommandType::Restart => "restart",
            CommandType::ShowAutomationEditor => "automation/editor/show",
            CommandType::ImprovDiscoveredDevice => "improv/discovered_device",
        }
    }

    pub fn from_wire(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_wire() == key)
    }
}

/// Any entry of the three catalogs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MessageKind {
    Core(MessageType),
    Extended(ExtendedMessageType),
    Command(CommandType),
}

impl MessageKind {
    /// Resolves an inbound wire key. Command keys are outbound-only and
    /// never resolve here.
    pub fn resolve(key: &str) -> Option<Self> {
        MessageType::from_wire(key)
            .map(MessageKind::Core)
            .or_else(|| ExtendedMessageType::from_wire(key).map(MessageKind::Extended))
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            MessageKind::Core(kind) => kind.as_wire(),
            MessageKind::Extended(kind) => kind.as_wire(),
            MessageKind::Command(kind) => kind.as_wire(),
        }
    }
}

impl From<MessageType> for MessageKind {
    fn from(kind: MessageType) -> Self {
        MessageKind::Core(kind)
    }
}

impl From<ExtendedMessageType> for MessageKind {
    fn from(kind: ExtendedMessageType) -> Self {
        MessageKind::Extended(kind)
    }
}

impl From<CommandType> for MessageKind {
    fn from(kind: CommandType) -> Self {
        MessageKind::Command(kind)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn core_catalog_is_stable() {
        assert_eq!(MessageType::ALL.len(), 10);
        assert_eq!(MessageType::ConfigGet.as_wire(), "config/get");
        assert_eq!(MessageType::ConfigScreenShow.as_wire(), "config_screen/show");
        assert_eq!(MessageType::Haptic.as_wire(), "haptic");
        assert_eq!(MessageType::ConnectionStatus.as_wire(), "connection-status");
        assert_eq!(MessageType::TagRead.as_wire(), "tag/read");
        assert_eq!(MessageType::TagWrite.as_wire(), "tag/write");
        assert_eq!(MessageType::ThemeUpdate.as_wire(), "theme-update");
        assert_eq!(MessageType::MatterCommission.as_wire(), "matter/commission");
        assert_eq!(
            MessageType::ThreadImportCredentials.as_wire(),
            "thread/import_credentials"
        );
        assert_eq!(MessageType::BarcodeScan.as_wire(), "barcode/scan");
    }

    #[test]
    fn wire_lookup_is_inverse_of_as_wire() {
        for kind in MessageType::ALL {
            assert_eq!(MessageType::from_wire(kind.as_wire()), Some(kind));
        }
        for kind in ExtendedMessageType::ALL {
            assert_eq!(ExtendedMessageType::from_wire(kind.as_wire()), Some(kind));
        }
        for kind in CommandType::ALL {
            assert_eq!(CommandType::from_wire(kind.as_wire()), Some(kind));
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(MessageType::from_wire("Config/Get"), None);
        assert_eq!(MessageType::from_wire(" haptic"), None);
        assert_eq!(MessageKind::resolve("HAPTIC"), None);
    }

    #[test]
    fn catalogs_are_disjoint() {
        let mut seen = HashSet::new();
        let keys = MessageType::ALL
            .iter()
            .map(|k| k.as_wire())
            .chain(ExtendedMessageType::ALL.iter().map(|k| k.as_wire()))
            .chain(CommandType::ALL.iter().map(|k| k.as_wire()));
        for key in keys {
            assert!(seen.insert(key), "duplicate wire key {key}");
        }
    }

    #[test]
    fn commands_never_resolve_inbound() {
        for kind in CommandType::ALL {
            assert_eq!(MessageKind::resolve(kind.as_wire()), None);
        }
        assert_eq!(
            MessageKind::resolve("toast/show"),
            Some(MessageKind::Extended(ExtendedMessageType::ToastShow))
        );
        assert_eq!(
            MessageKind::resolve("tag/read"),
            Some(MessageKind::Core(MessageType::TagRead))
        );
    }
}
