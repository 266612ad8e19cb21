//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports keep the download strategies free of transport details. The
//! host decides where payloads end up.

mod event_sink;

#[cfg(test)]
pub use event_sink::MockEventSink;
pub use event_sink::{EventSink, NoopSink, SinkError, StdoutSink};
