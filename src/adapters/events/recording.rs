//! In-memory event capture for tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::agent::{AgentEvent, AgentEventType};
use crate::ports::EventSink;

/// Keeps every event it receives, in order.
///
/// # Example
///
/// ```ignore
/// let sink = RecordingEventSink::new();
/// orchestrator.run("Jane Doe", &sink).await;
///
/// assert_eq!(sink.count(AgentEventType::Complete), 1);
/// ```
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<AgentEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    pub fn events(&self) -> Vec<AgentEvent> {
        self.lock().clone()
    }

    /// Event types in emission order.
    pub fn types(&self) -> Vec<AgentEventType> {
        self.lock().iter().map(|e| e.event_type).collect()
    }

    pub fn count(&self, event_type: AgentEventType) -> usize {
        self.lock().iter().filter(|e| e.event_type == event_type).count()
    }

    pub fn of_type(&self, event_type: AgentEventType) -> Vec<AgentEvent> {
        self.lock()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<AgentEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for RecordingEventSink {
    fn on_event(&self, event: &AgentEvent) {
        self.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::AgentEventKind;
    use crate::domain::foundation::RunId;

    #[test]
    fn records_in_order() {
        let sink = RecordingEventSink::new();
        let run_id = RunId::new();

        sink.on_event(&AgentEvent::new(run_id, 0, Some(1), AgentEventKind::IterationStart));
        sink.on_event(&AgentEvent::new(
            run_id,
            1,
            Some(1),
            AgentEventKind::Nudge {
                message: "use a tool".to_string(),
            },
        ));

        assert_eq!(
            sink.types(),
            vec![AgentEventType::IterationStart, AgentEventType::Nudge]
        );
        assert_eq!(sink.count(AgentEventType::Nudge), 1);
        assert_eq!(sink.of_type(AgentEventType::Nudge)[0].sequence, 1);
        assert_eq!(sink.len(), 2);
    }
}
