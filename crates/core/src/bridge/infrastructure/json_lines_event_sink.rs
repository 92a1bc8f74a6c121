use std::io::Write;

use crate::bridge::domain::event_codec::BridgeEvent;
use crate::bridge::domain::event_sink::EventSink;

/// Writes one JSON object per event, newline-delimited.
///
/// Write failures are logged and otherwise ignored: losing a UI event must
/// never interrupt frame processing.
pub struct JsonLinesEventSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLinesEventSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> EventSink for JsonLinesEventSink<W> {
    fn emit(&mut self, event: &BridgeEvent) {
        let result = serde_json::to_writer(&mut self.writer, event)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush());
        if let Err(e) = result {
            log::warn!("Failed to write bridge event: {e}");
        }
    }
}
