//! Progress emission with channel fallback.
//!
//! Delivery order for every payload:
//! 1. The sink registered by the host
//! 2. The host bridge, when one was injected
//! 3. The console channel (stdout unless overridden)
//!
//! A failed channel is logged and the next one is tried. Nothing here ever
//! returns an error to the download loop.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::events::ProgressEvent;
use crate::ports::{EventSink, StdoutSink};

/// Channel that accepted a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sink,
    Bridge,
    Console,
    /// Every channel failed.
    Dropped,
}

/// Routes events to the host through the fallback chain.
pub struct ProgressEmitter {
    sink: RwLock<Option<Arc<dyn EventSink>>>,
    bridge: Option<Arc<dyn EventSink>>,
    console: Arc<dyn EventSink>,
}

impl ProgressEmitter {
    /// Emitter with no sink, no bridge and stdout as console.
    pub fn new() -> Self {
        Self {
            sink: RwLock::new(None),
            bridge: None,
            console: Arc::new(StdoutSink),
        }
    }

    /// Inject the secondary host bridge.
    #[must_use]
    pub fn with_bridge(mut self, bridge: Arc<dyn EventSink>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Replace the console channel.
    #[must_use]
    pub fn with_console(mut self, console: Arc<dyn EventSink>) -> Self {
        self.console = console;
        self
    }

    /// Register (or clear) the host sink.
    pub fn set_sink(&self, sink: Option<Arc<dyn EventSink>>) {
        *self.sink.write().unwrap_or_else(PoisonError::into_inner) = sink;
    }

    /// Whether a host sink is registered.
    pub fn has_sink(&self) -> bool {
        self.sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Serialize and deliver one event.
    pub fn emit(&self, event: &ProgressEvent) -> Delivery {
        self.emit_payload(&event.to_json())
    }

    /// Deliver an already serialized payload.
    pub fn emit_payload(&self, payload: &str) -> Delivery {
        debug!(payload, "emitting event");

        let sink = self
            .sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if let Some(sink) = sink {
            match sink.emit(payload) {
                Ok(()) => return Delivery::Sink,
                Err(e) => warn!(error = %e, "event sink failed, falling back"),
            }
        }

        if let Some(bridge) = &self.bridge {
            match bridge.emit(payload) {
                Ok(()) => return Delivery::Bridge,
                Err(e) => warn!(error = %e, "host bridge failed, falling back to console"),
            }
        }

        match self.console.emit(payload) {
            Ok(()) => Delivery::Console,
            Err(e) => {
                warn!(error = %e, "console write failed, event dropped");
                Delivery::Dropped
            }
        }
    }
}

impl Default for ProgressEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProgressEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressEmitter")
            .field("has_sink", &self.has_sink())
            .field("has_bridge", &self.bridge.is_some())
            .finish_non_exhaustive()
    }
}
