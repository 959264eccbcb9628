use std::cell::RefCell;
use std::io::{self, Write};

use bus::ScriptSink;
use tracing::error;

/// Writes each emitted script as one line, for hosts without a web view.
pub struct WriterSink<W: Write> {
    writer: RefCell<W>,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: RefCell::new(writer),
        }
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ScriptSink for WriterSink<W> {
    fn evaluate(&self, script: &str) {
        let mut writer = self.writer.borrow_mut();
        if let Err(err) = writeln!(writer, "{script}").and_then(|()| writer.flush()) {
            error!("failed to write script: {err}");
        }
    }
}

#[cfg(test)]
impl WriterSink<Vec<u8>> {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.writer.borrow())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// Evaluates scripts inside the dashboard web view.
#[cfg(feature = "webkit")]
pub struct WebViewSink {
    view: webkit6::WebView,
}

#[cfg(feature = "webkit")]
impl WebViewSink {
    pub fn new(view: webkit6::WebView) -> Self {
        Self { view }
    }
}

#[cfg(feature = "webkit")]
impl ScriptSink for WebViewSink {
    fn evaluate(&self, script: &str) {
        use webkit6::prelude::*;

        self.view.evaluate_javascript(
            script,
            None,
            None,
            None::<&gtk::gio::Cancellable>,
            |result| {
                if let Err(err) = result {
                    error!("failed to fire message to externalBus: {err}");
                }
            },
        );
    }
}
