//! Test capture mode for deterministic logging assertions
//!
//! This module provides in-memory stand-ins for the three injectable
//! collaborators of a `Logger`: the writer, the id generator and the exit
//! handler.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use reqlog_core_types::{IdGenerator, RequestId};
use tracing_subscriber::fmt::MakeWriter;

use crate::enrich::ExitHandler;

/// Shared in-memory writer; clones append to the same buffer
#[derive(Clone, Default)]
pub struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CaptureWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    pub fn output(&self) -> String {
        self.buffer
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }

    /// Written output split into lines
    pub fn lines(&self) -> Vec<String> {
        self.output().lines().map(str::to_string).collect()
    }

    /// Parse every line as JSON
    ///
    /// # Errors
    ///
    /// Returns the first line that fails to parse.
    pub fn json_lines(&self) -> Result<Vec<serde_json::Value>, serde_json::Error> {
        self.lines()
            .iter()
            .map(|line| serde_json::from_str(line))
            .collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().map(|mut buf| buf.clear()).ok();
    }
}

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| io::Error::other("capture buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Writer whose every write fails, for exercising sink-failure paths
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for FailingWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        *self
    }
}

/// Panic payload raised by `RecordingExit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitRequested(pub i32);

/// Exit handler that records the status and unwinds instead of exiting
///
/// Catch the unwind with `std::panic::catch_unwind` and downcast the
/// payload to `ExitRequested`.
#[derive(Clone, Default)]
pub struct RecordingExit {
    codes: Arc<Mutex<Vec<i32>>>,
}

impl RecordingExit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every status passed to `exit`, in order
    pub fn codes(&self) -> Vec<i32> {
        self.codes.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl ExitHandler for RecordingExit {
    fn exit(&self, code: i32) -> ! {
        self.codes.lock().map(|mut c| c.push(code)).ok();
        std::panic::panic_any(ExitRequested(code))
    }
}

/// Deterministic ids: `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> RequestId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        RequestId::from_string(format!("{}-{}", self.prefix, n))
    }
}
