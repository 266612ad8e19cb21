//! Common test utilities.
//!
//! Fake tool scripts standing in for `spotdl`, and a sink that records
//! every event it receives.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use spotbridge_core::{EventSink, ProgressEvent, SinkError};

/// Sink that parses and stores every payload.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn last(&self) -> ProgressEvent {
        self.events().last().cloned().expect("no events recorded")
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, payload: &str) -> Result<(), SinkError> {
        let event =
            serde_json::from_str(payload).map_err(|e| SinkError::Rejected(e.to_string()))?;
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// Write an executable shell script named `name` into `dir`.
///
/// The script records its arguments, one per line, in `<dir>/args.txt`
/// before running `body`.
#[cfg(unix)]
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    let args_file = dir.join("args.txt");
    let script = format!(
        "#!/bin/sh\nfor arg in \"$@\"; do printf '%s\\n' \"$arg\" >> '{}'; done\n{body}\n",
        args_file.display()
    );
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Arguments recorded by a fake tool in `dir`.
pub fn recorded_args(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("args.txt"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
