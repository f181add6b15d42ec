//! Event Sink Port - receives a run's events as they happen.

use crate::domain::agent::AgentEvent;

/// Consumer of the agent event stream.
///
/// Called synchronously, in emission order, from the orchestrator's task.
/// Implementations must not block for long; forward to a channel if the
/// real consumer is slow.
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &AgentEvent);
}

impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn on_event(&self, event: &AgentEvent) {
        (**self).on_event(event)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn on_event(&self, _event: &AgentEvent) {}
}
