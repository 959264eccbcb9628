use std::rc::Rc;

use bus::capability::{HapticEngine, Improv, MatterClient, Unavailable};
use bus::payload::{HapticKind, MatterCommissionPayload};
use bus::Capabilities;
use tracing::info;

use crate::state::ShellHandle;

/// Hardware-backed capabilities this host has no driver for.
///
/// Requests are logged so the dashboard flow can be followed end to end.
#[derive(Debug, Default)]
pub struct LoggedDevices;

impl HapticEngine for LoggedDevices {
    fn perform(&self, kind: HapticKind) {
        info!(haptic = kind.as_wire(), "haptic feedback");
    }
}

impl MatterClient for LoggedDevices {
    fn commission(&self, request: &MatterCommissionPayload) {
        match &request.preferred_network {
            Some(network) => info!(
                extended_pan_id = %network.extended_pan_id,
                "matter commission with preferred thread network"
            ),
            None => info!("matter commission"),
        }
    }
}

impl Improv for LoggedDevices {
    fn scan(&self) {
        info!("improv scan requested");
    }

    fn configure(&self, device_name: Option<&str>) {
        info!(device = device_name.unwrap_or("<any>"), "improv configure requested");
    }
}

/// Wires the shell state and device stand-ins into a capability set.
pub fn capabilities(shell: &ShellHandle) -> Capabilities {
    let shell = Rc::new(shell.clone());
    let devices = Rc::new(LoggedDevices);
    Capabilities {
        ui: shell.clone(),
        haptics: devices.clone(),
        tags: Rc::new(Unavailable),
        theme: shell.clone(),
        matter: devices.clone(),
        thread: shell.clone(),
        barcode: shell.clone(),
        improv: devices,
        toasts: shell,
    }
}
