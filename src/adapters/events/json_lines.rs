//! JSON-lines export of an event stream.
//!
//! Each event is written as one compact JSON object followed by a newline,
//! which `RunReplay::from_events` can read back after parsing each line.

use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::agent::AgentEvent;
use crate::ports::EventSink;

pub struct JsonLinesEventSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesEventSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_event(&self, event: &AgentEvent) -> std::io::Result<()> {
        let mut writer = self.lock();
        serde_json::to_writer(&mut *writer, event)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

impl<W: Write + Send> EventSink for JsonLinesEventSink<W> {
    fn on_event(&self, event: &AgentEvent) {
        if let Err(e) = self.write_event(event) {
            tracing::warn!(
                sequence = event.sequence,
                error = %e,
                "Failed to write event line"
            );
        }
    }
}
