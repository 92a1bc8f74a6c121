use crate::bridge::domain::event_codec::BridgeEvent;

/// Receiver of structured events on the UI side of the boundary.
pub trait EventSink: Send {
    fn emit(&mut self, event: &BridgeEvent);
}

/// Sink that drops every event.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&mut self, _event: &BridgeEvent) {}
}
