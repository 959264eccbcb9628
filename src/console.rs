use std::io::{self, BufRead};
use std::rc::Rc;

use bus::capability::BarcodeScanner;
use bus::payload::{ConnectionEvent, ThemeUpdatePayload};
use bus::{Dispatcher, Emitter, Outcome};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::devices;
use crate::ipc::WriterSink;
use crate::state::ShellHandle;

/// Prefix for lines that act on the native side instead of the bus.
const NATIVE_PREFIX: char = ':';

/// Native events the console stands in for.
#[derive(Debug, Clone, PartialEq)]
enum NativeCommand {
    /// `:scan <format> <value>` finishes the open barcode scan.
    Scan { format: String, value: String },
    /// `:close-scanner` dismisses the scanner without a result.
    CloseScanner,
    /// `:navigate <path>`
    Navigate(String),
    /// `:connection connected|disconnected|auth-invalid`
    Connection(ConnectionEvent),
    /// `:dark on|off` follows a system color scheme change.
    Dark(bool),
    /// `:status` logs the shell state.
    Status,
}

impl NativeCommand {
    fn parse(line: &str) -> Option<Self> {
        let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        match name {
            "scan" => {
                let (format, value) = rest.split_once(' ')?;
                let value = value.trim();
                if format.is_empty() || value.is_empty() {
                    return None;
                }
                Some(Self::Scan {
                    format: format.to_string(),
                    value: value.to_string(),
                })
            }
            "close-scanner" => Some(Self::CloseScanner),
            "navigate" if !rest.is_empty() => Some(Self::Navigate(rest.to_string())),
            "connection" => ConnectionEvent::from_wire(rest).map(Self::Connection),
            "dark" => match rest {
                "on" => Some(Self::Dark(true)),
                "off" => Some(Self::Dark(false)),
                _ => None,
            },
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    fn apply(self, shell: &ShellHandle) {
        match self {
            Self::Scan { format, value } => {
                if !shell.complete_scan(&format, &value) {
                    warn!(%format, "no barcode scan is waiting for a result");
                }
            }
            Self::CloseScanner => shell.close(),
            Self::Navigate(path) => shell.navigate(&path),
            Self::Connection(event) => shell.report_connection(event),
            Self::Dark(dark_mode) => {
                let theme = ThemeUpdatePayload {
                    dark_mode,
                    ..shell.state().theme.clone()
                };
                shell.push_theme(theme);
            }
            Self::Status => {
                let state = shell.state();
                let overlay = state
                    .overlay
                    .as_ref()
                    .map_or_else(|| "none".to_string(), ToString::to_string);
                info!(
                    connection = state.connection.map_or("unknown", ConnectionEvent::as_wire),
                    %overlay,
                    toast = state.toast.as_ref().map_or("none", |toast| toast.id.as_str()),
                    notices = state.notices.len(),
                    dark_mode = state.theme.dark_mode,
                    "shell state"
                );
            }
        }
    }
}

/// Runs the bus against stdin/stdout: one wire message per input line, one
/// emitted script per output line. Lines starting with `:` are native events.
pub fn run(config: &Config) -> io::Result<()> {
    let sink = Rc::new(WriterSink::stdout());
    let emitter = Emitter::with_receiver(sink, &config.shell.script_receiver);
    let shell = ShellHandle::new(emitter.clone());
    let dispatcher = Dispatcher::new(
        devices::capabilities(&shell),
        emitter,
        config.capabilities.clone(),
    );

    info!(
        dashboard = %config.shell.dashboard_url,
        "console host ready, reading external bus messages from stdin"
    );
    let handled = serve(&dispatcher, &shell, io::stdin().lock())?;
    info!(handled, "input closed");
    Ok(())
}

/// Dispatches every non-blank line and returns how many bus messages were
/// handled.
pub fn serve<R: BufRead>(dispatcher: &Dispatcher, shell: &ShellHandle, input: R) -> io::Result<usize> {
    let mut handled = 0;
    for line in input.lines() {
        let line = line?;
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }
        if let Some(native) = raw.strip_prefix(NATIVE_PREFIX) {
            match NativeCommand::parse(native.trim()) {
                Some(command) => command.apply(shell),
                None => warn!(line = raw, "unrecognized native command"),
            }
            continue;
        }
        let outcome = dispatcher.dispatch_raw(raw);
        debug!(?outcome, "dispatched");
        if matches!(outcome, Outcome::Handled(_)) {
            handled += 1;
        }
    }
    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Overlay;
    use std::io::Cursor;

    #[test]
    fn serves_lines_in_order() {
        let sink = Rc::new(WriterSink::new(Vec::new()));
        let emitter = Emitter::new(Rc::clone(&sink));
        let shell = ShellHandle::new(emitter.clone());
        let dispatcher = Dispatcher::new(
            devices::capabilities(&shell),
            emitter,
            Config::default().capabilities,
        );
        let input = Cursor::new(
            r#"{"id": 1, "type": "config/get"}

{"type": "config_screen/show"}
{"type": "unknown/type"}
not json
{"type": "toast/show", "payload": {"id": "t", "message": "Saved", "duration": "soon"}}
{"id": 2, "type": "tag/read"}
"#,
        );

        let handled = serve(&dispatcher, &shell, input).unwrap();

        assert_eq!(handled, 4);
        assert_eq!(shell.state().overlay, Some(Overlay::Settings));
        let toast = shell.state().toast.clone().unwrap();
        assert_eq!(toast.message, "Saved");
        assert_eq!(toast.duration, None);

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(r#"window.externalBus({"id":1,"type":"result","success":true"#));
        assert!(lines[1].starts_with(r#"window.externalBus({"id":2,"type":"result","success":false"#));
    }

    #[test]
    fn native_lines_finish_scans_and_push_events() {
        let sink = Rc::new(WriterSink::new(Vec::new()));
        let emitter = Emitter::new(Rc::clone(&sink));
        let shell = ShellHandle::new(emitter.clone());
        let dispatcher = Dispatcher::new(
            devices::capabilities(&shell),
            emitter,
            Config::default().capabilities,
        );
        let input = Cursor::new(
            r#"{"id": 30, "type": "barcode/scan", "payload": {"title": "Scan", "description": "QR"}}
:scan qr_code WIFI:S:home;;
:scan qr_code too late
:connection auth-invalid
:navigate /config/devices
:dark on
:dark on
:status
:bogus
"#,
        );

        let handled = serve(&dispatcher, &shell, input).unwrap();

        assert_eq!(handled, 1);
        assert!(!shell.state().scanner_open());
        assert_eq!(shell.state().connection, Some(ConnectionEvent::AuthInvalid));
        assert!(shell.state().theme.dark_mode);

        let lines = sink.lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains(r#""id":30,"type":"result","success":true"#));
        assert!(lines[0].contains(r#""rawValue":"WIFI:S:home;;""#));
        assert!(lines[1].contains(r#""type":"connection-status""#));
        assert!(lines[2].contains(r#""command":"navigate""#));
        assert!(lines[3].contains(r#""type":"theme-update""#));
    }

    #[test]
    fn parses_native_commands() {
        assert_eq!(
            NativeCommand::parse("scan ean_13 4006381333931"),
            Some(NativeCommand::Scan {
                format: "ean_13".into(),
                value: "4006381333931".into(),
            })
        );
        assert_eq!(NativeCommand::parse("scan qr_code"), None);
        assert_eq!(NativeCommand::parse("navigate"), None);
        assert_eq!(NativeCommand::parse("connection lost"), None);
        assert_eq!(NativeCommand::parse("dark off"), Some(NativeCommand::Dark(false)));
        assert_eq!(NativeCommand::parse("close-scanner"), Some(NativeCommand::CloseScanner));
    }
}
