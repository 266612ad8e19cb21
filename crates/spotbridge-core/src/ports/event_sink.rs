//! Event sink port.
//!
//! A sink receives serialized JSON payloads. The host registers one; the
//! emitter falls back to other channels when it fails.

use std::io::{self, Write};

use thiserror::Error;

/// Error raised by a sink that could not accept a payload.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The receiving side is gone.
    #[error("event sink disconnected")]
    Disconnected,

    /// Writing the payload failed.
    #[error("event sink write failed: {0}")]
    Io(#[from] io::Error),

    /// Host-specific failure.
    #[error("event sink rejected payload: {0}")]
    Rejected(String),
}

/// Trait for delivering JSON payloads to the host.
///
/// # Implementations
///
/// - `NoopSink` - Discards everything, for tests
/// - `StdoutSink` - One payload per line on standard output
/// - Host-specific implementations (FFI callbacks, channels, etc.)
#[cfg_attr(test, mockall::automock)]
pub trait EventSink: Send + Sync {
    /// Deliver one payload.
    ///
    /// This method should not block for long; it is called from the
    /// download loop.
    fn emit(&self, payload: &str) -> Result<(), SinkError>;
}

/// A sink that discards all payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NoopSink {
    /// Create a new no-op sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EventSink for NoopSink {
    fn emit(&self, _payload: &str) -> Result<(), SinkError> {
        Ok(())
    }
}

/// A sink writing each payload as a flushed line on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl EventSink for StdoutSink {
    fn emit(&self, payload: &str) -> Result<(), SinkError> {
        let mut out = io::stdout().lock();
        writeln!(out, "{payload}")?;
        out.flush()?;
        Ok(())
    }
}
