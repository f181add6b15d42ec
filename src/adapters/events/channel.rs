//! Ordered event delivery over a tokio channel.
//!
//! The orchestrator emits synchronously; a consumer task on the other end of
//! the channel sees events in exactly the order they were produced.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::domain::agent::AgentEvent;
use crate::ports::EventSink;

#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    sender: UnboundedSender<AgentEvent>,
}

impl ChannelEventSink {
    /// Creates a sink and the receiver that drains it.
    pub fn new() -> (Self, UnboundedReceiver<AgentEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelEventSink {
    fn on_event(&self, event: &AgentEvent) {
        if self.sender.send(event.clone()).is_err() {
            tracing::debug!(
                sequence = event.sequence,
                "event receiver dropped, discarding event"
            );
        }
    }
}
